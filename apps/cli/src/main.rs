#![deny(warnings)]

//! Headless CLI: run one regional scenario from a YAML run file and print the
//! result bundle as JSON.

use anyhow::{Context, Result};
use baseline_store::{
    ensure_parent_dir, insert_records, save_run, synthetic, upsert_regions, SqliteBaselineStore,
};
use scenario_core::ScenarioParameters;
use scenario_engine::{run_scenario, EngineConfig, SimulationOutput};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Run file used when `--config` is not given: an in-memory store seeded
/// with the synthetic demo regions.
const DEMO_RUN: &str = r#"
database_url: "sqlite::memory:"
seed: 42
scenario:
  domain: agriculture
  start_date: "2024-01-01"
  end_date: "2024-06-30"
  rainfall_change_pct: -30
  temperature_change_c: 2.5
  irrigation_improvement_pct: 0
  crop_type: coffee
engine:
  top_stressed_limit: 3
"#;

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    seed_demo: bool,
    out: Option<PathBuf>,
    version: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Args {
    let mut parsed = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => parsed.config = it.next().map(PathBuf::from),
            "--seed-demo" => parsed.seed_demo = true,
            "--out" => parsed.out = it.next().map(PathBuf::from),
            "--version" => parsed.version = true,
            _ => {}
        }
    }
    parsed
}

fn default_database_url() -> String {
    baseline_store::default_sqlite_url().to_string()
}

fn default_seed() -> u64 {
    42
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunFile {
    #[serde(default = "default_database_url")]
    database_url: String,
    /// Seed of the synthetic baseline written by `--seed-demo`.
    #[serde(default = "default_seed")]
    seed: u64,
    scenario: ScenarioParameters,
    #[serde(default)]
    engine: EngineConfig,
}

impl RunFile {
    fn parse(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("parsing run file")
    }

    /// In-memory stores start empty and always need the demo baseline.
    fn needs_seed(&self, seed_demo: bool) -> bool {
        seed_demo || self.database_url.contains(":memory:")
    }
}

async fn seed_demo_baseline(store: &SqliteBaselineStore, run: &RunFile) -> Result<()> {
    let snapshot = synthetic::generate(&synthetic::demo_regions(), run.scenario.period(), run.seed);
    upsert_regions(store.pool(), &snapshot.regions).await?;
    let rows = insert_records(store.pool(), &snapshot.records).await?;
    info!(seed = run.seed, rows, "seeded demo baseline");
    Ok(())
}

fn print_summary(out: &SimulationOutput) {
    let s = &out.summary;
    println!(
        "Run {} | records: {} | avg stress: {:.3} | max stress: {:.3} | loss: {:.1} ({:.2}%) | stressed regions: {}",
        out.domain,
        s.record_count,
        s.avg_stress,
        s.max_stress,
        s.losses.total_loss(),
        s.losses.total_loss_pct(),
        s.regions_over_threshold
    );
    if let Some(e) = &out.economic_analysis {
        println!(
            "Economics | investment: ${} | loss prevented: ${} | ROI: {}%",
            e.investment_required_usd, e.loss_prevented_usd, e.roi_pct
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1));
    if args.version {
        println!("{} {}", env!("CARGO_PKG_VERSION"), env!("GIT_SHA"));
        return Ok(());
    }
    info!(config = ?args.config, seed_demo = args.seed_demo, "starting CLI");

    let run = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            RunFile::parse(&text)?
        }
        None => RunFile::parse(DEMO_RUN)?,
    };

    ensure_parent_dir(&run.database_url)?;
    let store = SqliteBaselineStore::open(&run.database_url).await?;
    if run.needs_seed(args.seed_demo) {
        seed_demo_baseline(&store, &run).await?;
    }

    let output = run_scenario(&store, &run.scenario, &run.engine).await?;

    // The result stands even if the run record cannot be written.
    match save_run(store.pool(), &run.scenario, &output).await {
        Ok(id) => info!(id, "run saved"),
        Err(e) => warn!(error = %format!("{e:#}"), "could not persist run"),
    }

    let json = serde_json::to_string_pretty(&output)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            print_summary(&output);
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_core::{CropFilter, CropType, Domain, RegionId};

    fn args(list: &[&str]) -> Args {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn flags_are_parsed() {
        let a = args(&["--config", "runs/dry.yaml", "--seed-demo", "--out", "out.json"]);
        assert_eq!(a.config, Some(PathBuf::from("runs/dry.yaml")));
        assert!(a.seed_demo);
        assert_eq!(a.out, Some(PathBuf::from("out.json")));
        assert_eq!(args(&["--bogus"]), Args::default());
    }

    #[test]
    fn demo_run_file_parses() {
        let run = RunFile::parse(DEMO_RUN).unwrap();
        assert_eq!(run.scenario.domain(), Domain::Agriculture);
        assert_eq!(run.scenario.crop_filter(), Some(CropFilter::Only(CropType::Coffee)));
        assert_eq!(run.engine.top_stressed_limit, 3);
        assert!(run.engine.include_economics);
        assert!(run.needs_seed(false));
    }

    #[test]
    fn region_list_restricts_engine() {
        let yaml = r#"
database_url: "sqlite://./data/test.db"
scenario:
  domain: water
  start_date: "2024-03-01"
  end_date: "2024-03-31"
  water_demand_growth_pct: 40
  conservation_rate_pct: 100
  rainfall_change_pct: 0
engine:
  region_ids: [2, 5]
"#;
        let run = RunFile::parse(yaml).unwrap();
        assert_eq!(run.seed, 42);
        assert!(!run.needs_seed(false));
        assert_eq!(run.engine.region_ids, Some(vec![RegionId(2), RegionId(5)]));
    }

    const ENERGY_SCENARIO: &str = r#"
scenario:
  domain: energy
  start_date: "2024-01-01"
  end_date: "2024-12-31"
  solar_growth_pct: 150
  demand_growth_pct: 20
  rainfall_change_pct: 0
"#;

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(RunFile::parse(ENERGY_SCENARIO).is_ok());
        assert!(RunFile::parse(&format!("{ENERGY_SCENARIO}foo: 1\n")).is_err());
        assert!(RunFile::parse(&format!("{ENERGY_SCENARIO}regions: [2]\n")).is_err());
    }

    #[test]
    fn misspelled_scenario_key_is_an_error() {
        let typo = ENERGY_SCENARIO.replace("solar_growth_pct", "solar_growth");
        let err = RunFile::parse(&typo).unwrap_err();
        assert!(format!("{err:#}").contains("solar_growth_pct"), "{err:#}");
    }
}
