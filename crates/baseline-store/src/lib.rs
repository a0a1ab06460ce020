#![deny(warnings)]

//! Baseline store: SQLite schema, the baseline provider over it, and run
//! records.
//!
//! Dates are stored as ISO `YYYY-MM-DD` text so range filters compare
//! lexicographically. Regional rows use an empty `crop_type` so the
//! `(region_id, date, crop_type)` key stays unique.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use scenario_core::{
    validate_baseline_record, validate_region, AltitudeBand, BaselineProvider, BaselineQuery,
    BaselineRecord, BaselineSnapshot, CropType, Domain, ProviderError, Region, RegionId,
    ScenarioParameters,
};
use scenario_engine::SimulationOutput;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::future::Future;
use std::str::FromStr;

pub mod synthetic;

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS regions (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        localized_name TEXT NOT NULL,
        altitude_band TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS baseline_records (
        region_id INTEGER NOT NULL REFERENCES regions(id),
        date TEXT NOT NULL,
        crop_type TEXT NOT NULL DEFAULT '',
        rainfall_mm REAL NOT NULL,
        temperature_c REAL NOT NULL,
        soil_moisture_pct REAL NOT NULL,
        energy_demand_kwh REAL NOT NULL,
        solar_capacity_factor REAL NOT NULL,
        water_demand_m3 REAL NOT NULL,
        water_supply_m3 REAL NOT NULL,
        baseline_yield_kg REAL,
        PRIMARY KEY (region_id, date, crop_type)
    )",
    "CREATE INDEX IF NOT EXISTS baseline_records_date ON baseline_records (date)",
    "CREATE TABLE IF NOT EXISTS simulation_runs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        domain TEXT NOT NULL,
        parameters_json TEXT NOT NULL,
        output_json TEXT NOT NULL,
        investment_cents INTEGER,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
];

/// Returns the default SQLite URL used for the local baseline database.
pub fn default_sqlite_url() -> &'static str {
    "sqlite://./data/baseline.db"
}

fn is_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Create the parent directory of a file-backed SQLite URL.
pub fn ensure_parent_dir(url: &str) -> Result<()> {
    if is_memory(url) {
        return Ok(());
    }
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"));
    if let Some(path) = path {
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
    }
    Ok(())
}

/// Open (creating if needed) the database at `url` and apply the schema.
pub async fn init_db(url: &str) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid sqlite url {url}"))?
        .create_if_missing(true);
    // Every connection to `:memory:` is its own database; keep exactly one.
    let pool = if is_memory(url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await?
    };
    for stmt in SCHEMA {
        sqlx::query(stmt).execute(&pool).await?;
    }
    tracing::debug!(url, "baseline schema ready");
    Ok(pool)
}

/// Convert a money amount to integer cents, rounding half away from zero.
pub fn decimal_to_cents_i64(amount: Decimal) -> Option<i64> {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Insert or update region reference rows.
pub async fn upsert_regions(pool: &SqlitePool, regions: &[Region]) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let mut written = 0;
    for r in regions {
        validate_region(r)?;
        written += sqlx::query(
            "INSERT INTO regions (id, name, localized_name, altitude_band) VALUES (?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                localized_name = excluded.localized_name,
                altitude_band = excluded.altitude_band",
        )
        .bind(i64::from(r.id.0))
        .bind(&r.name)
        .bind(&r.localized_name)
        .bind(r.altitude_band.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }
    tx.commit().await?;
    Ok(written)
}

/// Insert or replace baseline rows. Malformed rows are rejected before
/// anything is written.
pub async fn insert_records(pool: &SqlitePool, records: &[BaselineRecord]) -> Result<u64> {
    for rec in records {
        validate_baseline_record(rec)
            .with_context(|| format!("baseline row for region {} on {}", rec.region_id, rec.date))?;
    }
    let mut tx = pool.begin().await?;
    let mut written = 0;
    for rec in records {
        written += sqlx::query(
            "INSERT INTO baseline_records (
                region_id, date, crop_type, rainfall_mm, temperature_c, soil_moisture_pct,
                energy_demand_kwh, solar_capacity_factor, water_demand_m3, water_supply_m3,
                baseline_yield_kg
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(region_id, date, crop_type) DO UPDATE SET
                rainfall_mm = excluded.rainfall_mm,
                temperature_c = excluded.temperature_c,
                soil_moisture_pct = excluded.soil_moisture_pct,
                energy_demand_kwh = excluded.energy_demand_kwh,
                solar_capacity_factor = excluded.solar_capacity_factor,
                water_demand_m3 = excluded.water_demand_m3,
                water_supply_m3 = excluded.water_supply_m3,
                baseline_yield_kg = excluded.baseline_yield_kg",
        )
        .bind(i64::from(rec.region_id.0))
        .bind(rec.date.to_string())
        .bind(rec.crop_type.map(CropType::as_str).unwrap_or(""))
        .bind(rec.rainfall_mm)
        .bind(rec.temperature_c)
        .bind(rec.soil_moisture_pct)
        .bind(rec.energy_demand_kwh)
        .bind(rec.solar_capacity_factor)
        .bind(rec.water_demand_m3)
        .bind(rec.water_supply_m3)
        .bind(rec.baseline_yield_kg)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }
    tx.commit().await?;
    tracing::info!(rows = written, "baseline rows stored");
    Ok(written)
}

fn region_id(row: &SqliteRow, column: &str) -> Result<RegionId> {
    let raw: i64 = row.try_get(column)?;
    Ok(RegionId(u32::try_from(raw).map_err(|_| anyhow!("region id {raw} out of range"))?))
}

fn region_from_row(row: &SqliteRow) -> Result<Region> {
    let band: String = row.try_get("altitude_band")?;
    Ok(Region {
        id: region_id(row, "id")?,
        name: row.try_get("name")?,
        localized_name: row.try_get("localized_name")?,
        altitude_band: AltitudeBand::from_str(&band)?,
    })
}

fn record_from_row(row: &SqliteRow) -> Result<BaselineRecord> {
    let date: String = row.try_get("date")?;
    let crop: String = row.try_get("crop_type")?;
    let crop_type = if crop.is_empty() {
        None
    } else {
        Some(CropType::from_str(&crop)?)
    };
    Ok(BaselineRecord {
        region_id: region_id(row, "region_id")?,
        date: NaiveDate::from_str(&date).map_err(|e| anyhow!("bad stored date {date}: {e}"))?,
        rainfall_mm: row.try_get("rainfall_mm")?,
        temperature_c: row.try_get("temperature_c")?,
        soil_moisture_pct: row.try_get("soil_moisture_pct")?,
        energy_demand_kwh: row.try_get("energy_demand_kwh")?,
        solar_capacity_factor: row.try_get("solar_capacity_factor")?,
        water_demand_m3: row.try_get("water_demand_m3")?,
        water_supply_m3: row.try_get("water_supply_m3")?,
        crop_type,
        baseline_yield_kg: row.try_get("baseline_yield_kg")?,
    })
}

/// Load the regions and rows answering `query`.
pub async fn load_snapshot(pool: &SqlitePool, query: &BaselineQuery) -> Result<BaselineSnapshot> {
    let regions = sqlx::query("SELECT id, name, localized_name, altitude_band FROM regions ORDER BY id")
        .fetch_all(pool)
        .await?
        .iter()
        .map(region_from_row)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .filter(|r| query.selects_region(r.id))
        .collect();

    let crop_clause = match query.domain {
        Domain::Agriculture => "crop_type <> ''",
        Domain::Energy | Domain::Water => "crop_type = ''",
    };
    let sql = format!(
        "SELECT * FROM baseline_records WHERE date BETWEEN ? AND ? AND {crop_clause}
         ORDER BY date, region_id, crop_type"
    );
    let records = sqlx::query(&sql)
        .bind(query.period.start_date.to_string())
        .bind(query.period.end_date.to_string())
        .fetch_all(pool)
        .await?
        .iter()
        .map(record_from_row)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .filter(|r| query.selects_record(r))
        .collect();

    Ok(BaselineSnapshot { regions, records })
}

/// Baseline provider backed by the SQLite store.
#[derive(Clone, Debug)]
pub struct SqliteBaselineStore {
    pool: SqlitePool,
}

impl SqliteBaselineStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn open(url: &str) -> Result<Self> {
        Ok(Self::new(init_db(url).await?))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl BaselineProvider for SqliteBaselineStore {
    fn fetch(
        &self,
        query: &BaselineQuery,
    ) -> impl Future<Output = Result<BaselineSnapshot, ProviderError>> + Send {
        let pool = self.pool.clone();
        let query = query.clone();
        async move {
            let snapshot = load_snapshot(&pool, &query)
                .await
                .map_err(|e| ProviderError::Backend(format!("{e:#}")))?;
            tracing::debug!(
                domain = %query.domain,
                regions = snapshot.regions.len(),
                records = snapshot.records.len(),
                "sqlite baseline fetch"
            );
            Ok(snapshot)
        }
    }
}

/// A persisted run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredRun {
    pub id: i64,
    pub parameters: ScenarioParameters,
    pub output: SimulationOutput,
    pub created_at: String,
}

/// Persist a finished run; returns its id.
pub async fn save_run(
    pool: &SqlitePool,
    params: &ScenarioParameters,
    output: &SimulationOutput,
) -> Result<i64> {
    let investment_cents = output
        .economic_analysis
        .as_ref()
        .and_then(|a| decimal_to_cents_i64(a.investment_required_usd));
    let res = sqlx::query(
        "INSERT INTO simulation_runs (domain, parameters_json, output_json, investment_cents)
         VALUES (?, ?, ?, ?)",
    )
    .bind(output.domain.as_str())
    .bind(serde_json::to_string(params)?)
    .bind(serde_json::to_string(output)?)
    .bind(investment_cents)
    .execute(pool)
    .await?;
    Ok(res.last_insert_rowid())
}

/// Load a persisted run by id.
pub async fn load_run(pool: &SqlitePool, id: i64) -> Result<Option<StoredRun>> {
    let row = sqlx::query(
        "SELECT id, parameters_json, output_json, created_at FROM simulation_runs WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let parameters: String = row.try_get("parameters_json")?;
    let output: String = row.try_get("output_json")?;
    Ok(Some(StoredRun {
        id: row.try_get("id")?,
        parameters: serde_json::from_str(&parameters).context("stored run parameters")?,
        output: serde_json::from_str(&output).context("stored run output")?,
        created_at: row.try_get("created_at")?,
    }))
}
