//! Crop response table.
//!
//! Each crop has an altitude suitability per band, a preferred rainfall band
//! and a preferred temperature band. Inside a band the response peaks at the
//! centre and eases to [`BAND_EDGE_RESPONSE`] at the edges; outside it keeps
//! falling linearly with a crop-specific slope and never drops below
//! [`RESPONSE_FLOOR`]. Coffee prefers cool highlands, sugar cane warm and wet
//! lowlands; corn and beans tolerate more and are penalised less.

use scenario_core::numeric::lerp;
use scenario_core::{AltitudeBand, CropType};

use crate::constants::{
    BAND_EDGE_RESPONSE, IRRIGATION_EFFECTIVENESS, RESPONSE_FLOOR, SOIL_MOISTURE_MAX_PCT,
    SOIL_MOISTURE_MIN_PCT,
};

/// Agronomic thresholds for one crop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropProfile {
    pub crop: CropType,
    /// Suitability for low, medium and high altitude bands.
    pub altitude: [f64; 3],
    /// Preferred rainfall band, mm.
    pub rain_band_mm: (f64, f64),
    /// Preferred temperature band, °C.
    pub temp_band_c: (f64, f64),
    /// Loss per unit of relative rainfall shortfall below the band.
    pub rain_deficit_slope: f64,
    /// Loss per unit of relative rainfall excess above the band.
    pub rain_excess_slope: f64,
    /// Loss per degree outside the temperature band.
    pub temp_slope_per_c: f64,
}

pub const COFFEE: CropProfile = CropProfile {
    crop: CropType::Coffee,
    altitude: [0.60, 0.85, 1.00],
    rain_band_mm: (50.0, 150.0),
    temp_band_c: (18.0, 25.0),
    rain_deficit_slope: 0.8,
    rain_excess_slope: 0.4,
    temp_slope_per_c: 0.08,
};

pub const SUGAR_CANE: CropProfile = CropProfile {
    crop: CropType::SugarCane,
    altitude: [1.00, 0.85, 0.50],
    rain_band_mm: (80.0, 200.0),
    temp_band_c: (24.0, 30.0),
    rain_deficit_slope: 0.8,
    rain_excess_slope: 0.3,
    temp_slope_per_c: 0.06,
};

pub const CORN: CropProfile = CropProfile {
    crop: CropType::Corn,
    altitude: [1.00, 1.00, 0.85],
    rain_band_mm: (40.0, 180.0),
    temp_band_c: (16.0, 30.0),
    rain_deficit_slope: 0.5,
    rain_excess_slope: 0.25,
    temp_slope_per_c: 0.04,
};

pub const BEANS: CropProfile = CropProfile {
    crop: CropType::Beans,
    altitude: [0.90, 1.00, 0.95],
    rain_band_mm: (40.0, 160.0),
    temp_band_c: (15.0, 27.0),
    rain_deficit_slope: 0.6,
    rain_excess_slope: 0.3,
    temp_slope_per_c: 0.05,
};

pub fn profile(crop: CropType) -> &'static CropProfile {
    match crop {
        CropType::Coffee => &COFFEE,
        CropType::SugarCane => &SUGAR_CANE,
        CropType::Corn => &CORN,
        CropType::Beans => &BEANS,
    }
}

fn floored(v: f64) -> f64 {
    v.max(RESPONSE_FLOOR).min(1.0)
}

/// Quadratic response inside `(lo, hi)`: 1 at the centre, [`BAND_EDGE_RESPONSE`]
/// at either edge.
fn in_band(v: f64, (lo, hi): (f64, f64)) -> f64 {
    let half = (hi - lo) / 2.0;
    let off = (v - (lo + half)) / half;
    1.0 - (1.0 - BAND_EDGE_RESPONSE) * off * off
}

impl CropProfile {
    pub fn altitude_multiplier(&self, band: AltitudeBand) -> f64 {
        match band {
            AltitudeBand::Low => self.altitude[0],
            AltitudeBand::Medium => self.altitude[1],
            AltitudeBand::High => self.altitude[2],
        }
    }

    pub fn is_below_rain_band(&self, rainfall_mm: f64) -> bool {
        rainfall_mm < self.rain_band_mm.0
    }

    /// Response to rainfall, with irrigation recovering part of a shortfall
    /// up to the band edge. Irrigation has no effect once rainfall reaches
    /// the preferred band.
    pub fn rainfall_multiplier(&self, rainfall_mm: f64, irrigation_pct: f64) -> f64 {
        let (lo, hi) = self.rain_band_mm;
        if self.is_below_rain_band(rainfall_mm) {
            let base = floored(BAND_EDGE_RESPONSE - self.rain_deficit_slope * (lo - rainfall_mm) / lo);
            let offset = (irrigation_pct / 100.0).clamp(0.0, 1.0) * IRRIGATION_EFFECTIVENESS;
            base + (BAND_EDGE_RESPONSE - base).max(0.0) * offset
        } else if rainfall_mm > hi {
            floored(BAND_EDGE_RESPONSE - self.rain_excess_slope * (rainfall_mm - hi) / hi)
        } else {
            in_band(rainfall_mm, self.rain_band_mm)
        }
    }

    pub fn temperature_multiplier(&self, temperature_c: f64) -> f64 {
        let (lo, hi) = self.temp_band_c;
        if temperature_c < lo {
            floored(BAND_EDGE_RESPONSE - self.temp_slope_per_c * (lo - temperature_c))
        } else if temperature_c > hi {
            floored(BAND_EDGE_RESPONSE - self.temp_slope_per_c * (temperature_c - hi))
        } else {
            in_band(temperature_c, self.temp_band_c)
        }
    }
}

/// Response to soil moisture: dry soil ramps 0.7 -> 1.0 between 20 % and
/// 30 %, waterlogged soil ramps 1.0 -> 0.85 between 70 % and 85 %.
pub fn soil_moisture_multiplier(moisture_pct: f64) -> f64 {
    let m = moisture_pct.clamp(SOIL_MOISTURE_MIN_PCT, SOIL_MOISTURE_MAX_PCT);
    if m < 30.0 {
        lerp(0.7, 1.0, (m - SOIL_MOISTURE_MIN_PCT) / 10.0)
    } else if m <= 70.0 {
        1.0
    } else {
        lerp(1.0, 0.85, (m - 70.0) / (SOIL_MOISTURE_MAX_PCT - 70.0))
    }
}
