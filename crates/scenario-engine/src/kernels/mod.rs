//! Daily computation kernels, one per domain.
//!
//! Every kernel turns one region's baseline for one day (plus the scenario
//! parameters and the elapsed fraction of the run) into a [`DailyResult`].
//! The agriculture kernel additionally threads soil moisture through each
//! region's day sequence.

use chrono::NaiveDate;
use scenario_core::{validate_baseline_record, BaselineRecord, DailyResult, Region, ScenarioParameters};

use crate::baseline::BaselineIndex;
use crate::error::{EngineError, EngineResult};

pub mod agriculture;
pub mod energy;
pub mod water;

/// Run the kernel matching the scenario's domain over the whole index.
pub fn run_domain(index: &BaselineIndex<'_>, params: &ScenarioParameters) -> EngineResult<Vec<DailyResult>> {
    match params {
        ScenarioParameters::Energy(p) => energy::run(index, p),
        ScenarioParameters::Water(p) => water::run(index, p),
        ScenarioParameters::Agriculture(p) => agriculture::run(index, p),
    }
}

/// Reject malformed baseline values with the region and date attached.
pub(crate) fn check_record(region: &Region, rec: &BaselineRecord) -> EngineResult<()> {
    validate_baseline_record(rec)
        .map_err(|e| EngineError::computation(region.id, rec.date, e.to_string()))
}

pub(crate) fn ensure_finite(
    region: &Region,
    date: NaiveDate,
    what: &'static str,
    v: f64,
) -> EngineResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(EngineError::computation(
            region.id,
            date,
            format!("non-finite {what}: {v}"),
        ))
    }
}

/// Date-major loop shared by the stateless kernels: for every day, every
/// region in id order, call `day` with the regional row and elapsed fraction.
pub(crate) fn each_region_day<F>(index: &BaselineIndex<'_>, mut day: F) -> EngineResult<Vec<DailyResult>>
where
    F: FnMut(&Region, &BaselineRecord, f64) -> EngineResult<DailyResult>,
{
    let period = index.period();
    let mut out = Vec::with_capacity(index.result_len());
    for (i, date) in period.days().enumerate() {
        let t = period.elapsed_fraction(i);
        for region in index.regions() {
            let rec = index.require(region.id, date, None)?;
            check_record(region, rec)?;
            out.push(day(region, rec, t)?);
        }
    }
    Ok(out)
}
