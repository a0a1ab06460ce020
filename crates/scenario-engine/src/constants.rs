//! Heuristic constants of the daily kernels.
//!
//! None of these are calibrated; they encode hand-authored, bounded responses.
//! Crop-specific thresholds live in [`crate::crops`].

/// Fraction of a rainfall reduction that carries into solar/hydro availability.
pub const ENERGY_RAINFALL_SENSITIVITY: f64 = 0.3;
/// Grid generation ceiling as a share of the baseline demand.
pub const GRID_CAPACITY_RATIO: f64 = 0.9;

/// Fraction of a rainfall change that carries into water supply.
pub const WATER_RAINFALL_SENSITIVITY: f64 = 0.8;
/// Upper bound of the rainfall multiplier on water supply.
pub const WATER_RAINFALL_MAX_GAIN: f64 = 1.5;

/// Soil moisture at the start of every run, in percent.
pub const SOIL_MOISTURE_SEED_PCT: f64 = 50.0;
/// Share of the previous day's soil moisture retained.
pub const SOIL_CARRY_OVER: f64 = 0.6;
/// Soil moisture points added per millimetre of rain.
pub const SOIL_RAIN_CONTRIBUTION_PER_MM: f64 = 0.2;
/// Cap on the daily rain contribution, in percentage points.
pub const SOIL_MAX_RAIN_CONTRIBUTION_PCT: f64 = 40.0;
pub const SOIL_MOISTURE_MIN_PCT: f64 = 20.0;
pub const SOIL_MOISTURE_MAX_PCT: f64 = 85.0;

/// Share of a rainfall deficit that full irrigation improvement recovers.
pub const IRRIGATION_EFFECTIVENESS: f64 = 0.8;
/// Lower bound of every crop response multiplier.
pub const RESPONSE_FLOOR: f64 = 0.2;
/// Crop response at either edge of a preferred band. The response is 1 at
/// the band centre.
pub const BAND_EDGE_RESPONSE: f64 = 0.9;

/// Length of the ranked stressed-region list.
pub const DEFAULT_TOP_STRESSED_LIMIT: usize = 5;
