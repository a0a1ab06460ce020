//! Scenario parameter sets, one variant per simulated domain.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dates::DateRange;
use crate::region::CropFilter;

/// The three simulated domains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Energy,
    Water,
    Agriculture,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Energy => "energy",
            Domain::Water => "water",
            Domain::Agriculture => "agriculture",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Energy scenario: solar build-out, demand growth and rainfall change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnergyParams {
    #[serde(flatten)]
    pub period: DateRange,
    /// Solar output growth reached by the end date, in percent.
    pub solar_growth_pct: f64,
    /// Demand growth reached by the end date, in percent.
    pub demand_growth_pct: f64,
    pub rainfall_change_pct: f64,
}

/// Water scenario: demand growth, conservation and rainfall change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterParams {
    #[serde(flatten)]
    pub period: DateRange,
    pub water_demand_growth_pct: f64,
    /// Share of the demand growth removed by conservation, in percent.
    pub conservation_rate_pct: f64,
    pub rainfall_change_pct: f64,
}

/// Agriculture scenario: climate shifts, irrigation and crop selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgricultureParams {
    #[serde(flatten)]
    pub period: DateRange,
    pub rainfall_change_pct: f64,
    /// Shift applied to every baseline temperature, in °C.
    pub temperature_change_c: f64,
    pub irrigation_improvement_pct: f64,
    pub crop_type: CropFilter,
}

/// A scenario parameter set tagged by its domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "snake_case")]
pub enum ScenarioParameters {
    Energy(EnergyParams),
    Water(WaterParams),
    Agriculture(AgricultureParams),
}

impl ScenarioParameters {
    pub fn domain(&self) -> Domain {
        match self {
            ScenarioParameters::Energy(_) => Domain::Energy,
            ScenarioParameters::Water(_) => Domain::Water,
            ScenarioParameters::Agriculture(_) => Domain::Agriculture,
        }
    }

    pub fn period(&self) -> DateRange {
        match self {
            ScenarioParameters::Energy(p) => p.period,
            ScenarioParameters::Water(p) => p.period,
            ScenarioParameters::Agriculture(p) => p.period,
        }
    }

    /// Crop selection for agriculture scenarios; `None` for other domains.
    pub fn crop_filter(&self) -> Option<CropFilter> {
        match self {
            ScenarioParameters::Agriculture(p) => Some(p.crop_type),
            _ => None,
        }
    }
}
