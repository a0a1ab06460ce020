#![deny(warnings)]

//! Core domain model for the regional scenario simulator.
//!
//! Regions, baseline time series, scenario parameters and the per-day result
//! rows are defined here together with their validation rules, the numeric
//! and date helpers shared by the kernels, and the boundary trait through
//! which baseline data is fetched.

pub mod dates;
pub mod numeric;
pub mod provider;
pub mod region;
pub mod results;
pub mod scenario;
pub mod validate;

pub use dates::DateRange;
pub use provider::{BaselineProvider, BaselineQuery, BaselineSnapshot, InMemoryBaseline, ProviderError};
pub use region::{AltitudeBand, BaselineRecord, CropFilter, CropType, Region, RegionId};
pub use results::{DailyDetail, DailyResult, LossBreakdown, RegionStress, SimulationSummary};
pub use scenario::{AgricultureParams, Domain, EnergyParams, ScenarioParameters, WaterParams};
pub use validate::{validate_baseline_record, validate_region, validate_scenario, ValidationError};
