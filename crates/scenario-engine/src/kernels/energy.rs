//! Energy kernel: projected demand against solar output and a capped grid.

use scenario_core::numeric::{clamp_unit, pct, pct_change, safe_ratio};
use scenario_core::{BaselineRecord, DailyDetail, DailyResult, EnergyParams, Region};

use super::{each_region_day, ensure_finite};
use crate::baseline::BaselineIndex;
use crate::constants::{ENERGY_RAINFALL_SENSITIVITY, GRID_CAPACITY_RATIO};
use crate::error::EngineResult;

/// Availability multiplier for solar/hydro generation. Only rainfall
/// reductions matter; the result stays in [0,1].
pub fn rainfall_availability(rainfall_change_pct: f64) -> f64 {
    (1.0 + ENERGY_RAINFALL_SENSITIVITY * pct(rainfall_change_pct.min(0.0))).clamp(0.0, 1.0)
}

/// Energy balance of one region on one day, `t` being the elapsed fraction.
pub fn compute_day(
    region: &Region,
    rec: &BaselineRecord,
    p: &EnergyParams,
    t: f64,
) -> EngineResult<DailyResult> {
    let base_demand = rec.energy_demand_kwh;
    let demand = (base_demand * (1.0 + pct(p.demand_growth_pct) * t)).max(0.0);
    let base_solar = base_demand * rec.solar_capacity_factor;
    let solar = (base_solar
        * (1.0 + pct(p.solar_growth_pct) * t)
        * rainfall_availability(p.rainfall_change_pct))
    .max(0.0);
    let ceiling = base_demand * GRID_CAPACITY_RATIO;
    let grid = (demand - solar).max(0.0).min(ceiling);
    let deficit = (demand - (solar + ceiling)).max(0.0);

    let solar_pct = ensure_finite(region, rec.date, "solar share", safe_ratio(solar, solar + grid) * 100.0)?;
    let stress = clamp_unit(safe_ratio(deficit, demand));

    Ok(DailyResult {
        date: rec.date,
        region_id: region.id,
        region_name: region.name.clone(),
        stress,
        detail: DailyDetail::Energy {
            demand_change_pct: pct_change(demand, base_demand),
            demand_kwh: ensure_finite(region, rec.date, "energy demand", demand)?,
            solar_kwh: ensure_finite(region, rec.date, "solar output", solar)?,
            grid_kwh: grid,
            deficit_kwh: deficit,
            solar_pct,
        },
    })
}

pub(crate) fn run(index: &BaselineIndex<'_>, p: &EnergyParams) -> EngineResult<Vec<DailyResult>> {
    each_region_day(index, |region, rec, t| compute_day(region, rec, p, t))
}
