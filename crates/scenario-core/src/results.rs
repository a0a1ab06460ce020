//! Per-day result rows and the aggregate summary of a run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::region::{CropType, RegionId};

/// Domain-specific measurements of one computed day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "snake_case")]
pub enum DailyDetail {
    Energy {
        /// Demand change relative to baseline, in percent.
        demand_change_pct: f64,
        demand_kwh: f64,
        solar_kwh: f64,
        grid_kwh: f64,
        deficit_kwh: f64,
        /// Solar share of total generation, in percent.
        solar_pct: f64,
    },
    Water {
        demand_change_pct: f64,
        demand_m3: f64,
        supply_m3: f64,
        deficit_m3: f64,
    },
    Agriculture {
        crop_type: CropType,
        /// Yield change relative to baseline, in percent.
        yield_change_pct: f64,
        soil_moisture_pct: f64,
        rainfall_mm: f64,
        temperature_c: f64,
        baseline_yield_kg: f64,
        actual_yield_kg: f64,
    },
}

impl DailyDetail {
    /// Percent change of the headline quantity relative to baseline.
    pub fn change_pct(&self) -> f64 {
        match self {
            DailyDetail::Energy {
                demand_change_pct, ..
            }
            | DailyDetail::Water {
                demand_change_pct, ..
            } => *demand_change_pct,
            DailyDetail::Agriculture {
                yield_change_pct, ..
            } => *yield_change_pct,
        }
    }

    /// What the region needed (demand) or expected (baseline yield).
    pub fn reference_amount(&self) -> f64 {
        match self {
            DailyDetail::Energy { demand_kwh, .. } => *demand_kwh,
            DailyDetail::Water { demand_m3, .. } => *demand_m3,
            DailyDetail::Agriculture {
                baseline_yield_kg, ..
            } => *baseline_yield_kg,
        }
    }

    /// What was actually delivered or harvested.
    pub fn delivered_amount(&self) -> f64 {
        match self {
            DailyDetail::Energy {
                demand_kwh,
                deficit_kwh,
                ..
            } => demand_kwh - deficit_kwh,
            DailyDetail::Water {
                demand_m3,
                deficit_m3,
                ..
            } => demand_m3 - deficit_m3,
            DailyDetail::Agriculture {
                actual_yield_kg, ..
            } => *actual_yield_kg,
        }
    }

    /// Shortfall of delivered against reference, never negative.
    pub fn loss(&self) -> f64 {
        (self.reference_amount() - self.delivered_amount()).max(0.0)
    }

    pub fn crop(&self) -> Option<CropType> {
        match self {
            DailyDetail::Agriculture { crop_type, .. } => Some(*crop_type),
            _ => None,
        }
    }
}

/// One computed row: a region on a date (and a crop for agriculture).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyResult {
    pub date: NaiveDate,
    pub region_id: RegionId,
    pub region_name: String,
    /// Normalized shortfall in [0,1].
    pub stress: f64,
    #[serde(flatten)]
    pub detail: DailyDetail,
}

/// Average stress of one region over the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionStress {
    pub region_id: RegionId,
    pub region_name: String,
    pub avg_stress: f64,
}

/// Domain-named loss totals so the JSON field names stay stable per domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LossBreakdown {
    Yield {
        total_yield_loss_kg: f64,
        total_yield_loss_pct: f64,
        most_affected_crop: Option<CropType>,
    },
    Energy {
        total_energy_deficit_kwh: f64,
        total_energy_deficit_pct: f64,
        most_affected_region: Option<RegionId>,
    },
    Water {
        total_water_deficit_m3: f64,
        total_water_deficit_pct: f64,
        most_affected_region: Option<RegionId>,
    },
}

impl LossBreakdown {
    pub fn total_loss(&self) -> f64 {
        match self {
            LossBreakdown::Yield {
                total_yield_loss_kg,
                ..
            } => *total_yield_loss_kg,
            LossBreakdown::Energy {
                total_energy_deficit_kwh,
                ..
            } => *total_energy_deficit_kwh,
            LossBreakdown::Water {
                total_water_deficit_m3,
                ..
            } => *total_water_deficit_m3,
        }
    }

    pub fn total_loss_pct(&self) -> f64 {
        match self {
            LossBreakdown::Yield {
                total_yield_loss_pct,
                ..
            } => *total_yield_loss_pct,
            LossBreakdown::Energy {
                total_energy_deficit_pct,
                ..
            } => *total_energy_deficit_pct,
            LossBreakdown::Water {
                total_water_deficit_pct,
                ..
            } => *total_water_deficit_pct,
        }
    }
}

/// Aggregate statistics recomputed from scratch on every run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub avg_stress: f64,
    pub max_stress: f64,
    #[serde(flatten)]
    pub losses: LossBreakdown,
    /// Highest average stress first, ties by ascending region id.
    pub top_stressed_regions: Vec<RegionStress>,
    /// Regions whose average stress exceeds the investment threshold.
    pub regions_over_threshold: usize,
    pub record_count: usize,
}
