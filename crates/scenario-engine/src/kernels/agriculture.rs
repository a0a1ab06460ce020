//! Agriculture kernel: crop yields under shifted rainfall and temperature.
//!
//! Soil moisture is the only state carried between days. Each region starts
//! from [`SOIL_MOISTURE_SEED_PCT`] and folds its days in strict date order;
//! regions never share an accumulator.

use chrono::NaiveDate;
use scenario_core::numeric::{clamp_unit, pct, pct_change, safe_ratio};
use scenario_core::{AgricultureParams, AltitudeBand, CropType, DailyDetail, DailyResult, Region};

use super::{check_record, ensure_finite};
use crate::baseline::BaselineIndex;
use crate::constants::{
    SOIL_CARRY_OVER, SOIL_MAX_RAIN_CONTRIBUTION_PCT, SOIL_MOISTURE_MAX_PCT, SOIL_MOISTURE_MIN_PCT,
    SOIL_MOISTURE_SEED_PCT, SOIL_RAIN_CONTRIBUTION_PER_MM,
};
use crate::crops::{profile, soil_moisture_multiplier};
use crate::error::{EngineError, EngineResult};

/// Soil moisture of one region, in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoilMoisture(f64);

impl SoilMoisture {
    pub fn seed() -> Self {
        SoilMoisture(SOIL_MOISTURE_SEED_PCT)
    }

    /// Next day's moisture: carry-over of today's plus the rain contribution.
    pub fn advance(self, rainfall_mm: f64) -> Self {
        let rain = (rainfall_mm.max(0.0) * SOIL_RAIN_CONTRIBUTION_PER_MM)
            .min(SOIL_MAX_RAIN_CONTRIBUTION_PCT);
        SoilMoisture(
            (SOIL_CARRY_OVER * self.0 + rain).clamp(SOIL_MOISTURE_MIN_PCT, SOIL_MOISTURE_MAX_PCT),
        )
    }

    pub fn pct(self) -> f64 {
        self.0
    }
}

/// Scenario-adjusted daily rainfall, never negative.
pub fn effective_rainfall(rainfall_mm: f64, rainfall_change_pct: f64) -> f64 {
    (rainfall_mm * (1.0 + pct(rainfall_change_pct))).max(0.0)
}

/// Climate seen by a crop on one day.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropConditions {
    pub altitude: AltitudeBand,
    pub rainfall_mm: f64,
    pub temperature_c: f64,
    pub soil_moisture_pct: f64,
    pub irrigation_pct: f64,
}

/// Yield of `crop` under `c`: the baseline scaled by the altitude, rainfall
/// (with irrigation), temperature and soil-moisture responses.
pub fn crop_yield(crop: CropType, baseline_yield_kg: f64, c: &CropConditions) -> f64 {
    let prof = profile(crop);
    baseline_yield_kg
        * prof.altitude_multiplier(c.altitude)
        * prof.rainfall_multiplier(c.rainfall_mm, c.irrigation_pct)
        * prof.temperature_multiplier(c.temperature_c)
        * soil_moisture_multiplier(c.soil_moisture_pct)
}

/// Stress of a harvest: share of the baseline yield lost, gains count as 0.
pub fn yield_stress(actual_kg: f64, baseline_kg: f64) -> f64 {
    if baseline_kg <= 0.0 {
        return 0.0;
    }
    clamp_unit(1.0 - safe_ratio(actual_kg, baseline_kg))
}

fn crop_day(
    region: &Region,
    date: NaiveDate,
    crop: CropType,
    baseline_yield_kg: f64,
    conditions: &CropConditions,
) -> EngineResult<DailyResult> {
    let actual = ensure_finite(
        region,
        date,
        "crop yield",
        crop_yield(crop, baseline_yield_kg, conditions),
    )?;
    Ok(DailyResult {
        date,
        region_id: region.id,
        region_name: region.name.clone(),
        stress: yield_stress(actual, baseline_yield_kg),
        detail: DailyDetail::Agriculture {
            crop_type: crop,
            yield_change_pct: pct_change(actual, baseline_yield_kg),
            soil_moisture_pct: conditions.soil_moisture_pct,
            rainfall_mm: conditions.rainfall_mm,
            temperature_c: conditions.temperature_c,
            baseline_yield_kg,
            actual_yield_kg: actual,
        },
    })
}

/// All days of one region, day-major then crop, folding soil moisture forward.
pub(crate) fn simulate_region(
    index: &BaselineIndex<'_>,
    region: &Region,
    p: &AgricultureParams,
) -> EngineResult<Vec<DailyResult>> {
    let crops = index.crops();
    let period = index.period();
    let mut rows = Vec::with_capacity(period.day_count() * crops.len());
    let Some(&climate_crop) = crops.first() else {
        return Ok(rows);
    };

    let last = period
        .days()
        .try_fold(SoilMoisture::seed(), |moisture, date| {
            let climate = index.require(region.id, date, Some(climate_crop))?;
            check_record(region, climate)?;
            let rainfall_mm = effective_rainfall(climate.rainfall_mm, p.rainfall_change_pct);
            let moisture = moisture.advance(rainfall_mm);
            let conditions = CropConditions {
                altitude: region.altitude_band,
                rainfall_mm,
                temperature_c: climate.temperature_c + p.temperature_change_c,
                soil_moisture_pct: moisture.pct(),
                irrigation_pct: p.irrigation_improvement_pct,
            };
            for &crop in crops {
                let rec = index.require(region.id, date, Some(crop))?;
                check_record(region, rec)?;
                let baseline = rec.baseline_yield_kg.ok_or_else(|| {
                    EngineError::computation(region.id, date, format!("{crop} row has no baseline yield"))
                })?;
                rows.push(crop_day(region, date, crop, baseline, &conditions)?);
            }
            Ok::<_, EngineError>(moisture)
        })?;
    tracing::debug!(region = %region.id, soil_moisture = last.pct(), "agriculture region done");
    Ok(rows)
}

/// Every region in id order, interleaved date-major, then region, then crop.
pub(crate) fn run(index: &BaselineIndex<'_>, p: &AgricultureParams) -> EngineResult<Vec<DailyResult>> {
    let per_crop_day = index.crops().len();
    let days = index.period().day_count();
    let mut per_region = index
        .regions()
        .iter()
        .map(|region| simulate_region(index, region, p).map(Vec::into_iter))
        .collect::<EngineResult<Vec<_>>>()?;

    let mut out = Vec::with_capacity(index.result_len());
    for _ in 0..days {
        for rows in per_region.iter_mut() {
            out.extend(rows.by_ref().take(per_crop_day));
        }
    }
    Ok(out)
}
