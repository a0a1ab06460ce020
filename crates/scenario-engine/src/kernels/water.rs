//! Water kernel: conservation-adjusted demand against rainfall-driven supply.

use scenario_core::numeric::{clamp_unit, pct, pct_change, safe_ratio};
use scenario_core::{BaselineRecord, DailyDetail, DailyResult, Region, WaterParams};

use super::{each_region_day, ensure_finite};
use crate::baseline::BaselineIndex;
use crate::constants::{WATER_RAINFALL_MAX_GAIN, WATER_RAINFALL_SENSITIVITY};
use crate::error::EngineResult;

/// Demand growth left after conservation, in percent.
pub fn effective_growth_pct(p: &WaterParams) -> f64 {
    p.water_demand_growth_pct * (1.0 - pct(p.conservation_rate_pct).clamp(0.0, 1.0))
}

/// Supply multiplier for a rainfall change, in [0, WATER_RAINFALL_MAX_GAIN].
pub fn rainfall_supply_factor(rainfall_change_pct: f64) -> f64 {
    (1.0 + WATER_RAINFALL_SENSITIVITY * pct(rainfall_change_pct)).clamp(0.0, WATER_RAINFALL_MAX_GAIN)
}

pub fn compute_day(
    region: &Region,
    rec: &BaselineRecord,
    p: &WaterParams,
    t: f64,
) -> EngineResult<DailyResult> {
    let base_demand = rec.water_demand_m3;
    let demand = (base_demand * (1.0 + pct(effective_growth_pct(p)) * t)).max(0.0);
    let supply = rec.water_supply_m3 * rainfall_supply_factor(p.rainfall_change_pct);
    let deficit = (demand - supply).max(0.0);

    Ok(DailyResult {
        date: rec.date,
        region_id: region.id,
        region_name: region.name.clone(),
        stress: clamp_unit(safe_ratio(deficit, demand)),
        detail: DailyDetail::Water {
            demand_change_pct: pct_change(demand, base_demand),
            demand_m3: ensure_finite(region, rec.date, "water demand", demand)?,
            supply_m3: ensure_finite(region, rec.date, "water supply", supply)?,
            deficit_m3: deficit,
        },
    })
}

pub(crate) fn run(index: &BaselineIndex<'_>, p: &WaterParams) -> EngineResult<Vec<DailyResult>> {
    each_region_day(index, |region, rec, t| compute_day(region, rec, p, t))
}
