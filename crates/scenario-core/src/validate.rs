//! Validation of scenario parameters, regions and baseline rows.

use chrono::NaiveDate;
use thiserror::Error;

use crate::dates::DateRange;
use crate::region::{BaselineRecord, Region, RegionId};
use crate::scenario::ScenarioParameters;

/// Longest accepted simulation window.
pub const MAX_RANGE_DAYS: usize = 3660;

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Start date after end date.
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    /// Window longer than [`MAX_RANGE_DAYS`].
    #[error("date range of {0} days exceeds the supported maximum of {MAX_RANGE_DAYS}")]
    RangeTooLong(usize),
    /// Numeric field outside its declared range.
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// Numeric field must be finite.
    #[error("non-finite numeric value for {0}")]
    NonFinite(&'static str),
    /// Quantity that must be non-negative.
    #[error("negative value for {0}")]
    Negative(&'static str),
    #[error("unknown crop type: {0}")]
    UnknownCrop(String),
    #[error("unknown altitude band: {0}")]
    UnknownAltitude(String),
    #[error("region {0} has an empty name")]
    EmptyRegionName(RegionId),
    /// Crop row without a baseline yield, or the reverse.
    #[error("crop row for region {0} is missing its baseline yield")]
    MissingYield(RegionId),
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite(field));
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Validate ordering and length of a simulation window.
pub fn validate_range(range: &DateRange) -> Result<(), ValidationError> {
    if range.start_date > range.end_date {
        return Err(ValidationError::InvertedRange {
            start: range.start_date,
            end: range.end_date,
        });
    }
    let days = range.day_count();
    if days > MAX_RANGE_DAYS {
        return Err(ValidationError::RangeTooLong(days));
    }
    Ok(())
}

/// Validate a scenario parameter set against its declared ranges.
pub fn validate_scenario(params: &ScenarioParameters) -> Result<(), ValidationError> {
    validate_range(&params.period())?;
    match params {
        ScenarioParameters::Energy(p) => {
            check_range("solar_growth_pct", p.solar_growth_pct, -100.0, 500.0)?;
            check_range("demand_growth_pct", p.demand_growth_pct, -100.0, 500.0)?;
            check_range("rainfall_change_pct", p.rainfall_change_pct, -100.0, 200.0)?;
        }
        ScenarioParameters::Water(p) => {
            check_range(
                "water_demand_growth_pct",
                p.water_demand_growth_pct,
                -100.0,
                500.0,
            )?;
            check_range("conservation_rate_pct", p.conservation_rate_pct, 0.0, 100.0)?;
            check_range("rainfall_change_pct", p.rainfall_change_pct, -100.0, 200.0)?;
        }
        ScenarioParameters::Agriculture(p) => {
            check_range("rainfall_change_pct", p.rainfall_change_pct, -100.0, 200.0)?;
            check_range("temperature_change_c", p.temperature_change_c, -10.0, 10.0)?;
            check_range(
                "irrigation_improvement_pct",
                p.irrigation_improvement_pct,
                0.0,
                100.0,
            )?;
        }
    }
    Ok(())
}

/// Validate region reference data.
pub fn validate_region(r: &Region) -> Result<(), ValidationError> {
    if r.name.trim().is_empty() {
        return Err(ValidationError::EmptyRegionName(r.id));
    }
    Ok(())
}

/// Validate the numeric content of one baseline row.
pub fn validate_baseline_record(r: &BaselineRecord) -> Result<(), ValidationError> {
    let fields = [
        ("rainfall_mm", r.rainfall_mm),
        ("temperature_c", r.temperature_c),
        ("soil_moisture_pct", r.soil_moisture_pct),
        ("energy_demand_kwh", r.energy_demand_kwh),
        ("solar_capacity_factor", r.solar_capacity_factor),
        ("water_demand_m3", r.water_demand_m3),
        ("water_supply_m3", r.water_supply_m3),
    ];
    for (name, v) in fields {
        if !v.is_finite() {
            return Err(ValidationError::NonFinite(name));
        }
    }
    for (name, v) in [
        ("rainfall_mm", r.rainfall_mm),
        ("energy_demand_kwh", r.energy_demand_kwh),
        ("water_demand_m3", r.water_demand_m3),
        ("water_supply_m3", r.water_supply_m3),
    ] {
        if v < 0.0 {
            return Err(ValidationError::Negative(name));
        }
    }
    check_range("solar_capacity_factor", r.solar_capacity_factor, 0.0, 1.0)?;
    match (r.crop_type, r.baseline_yield_kg) {
        (Some(_), None) => return Err(ValidationError::MissingYield(r.region_id)),
        (_, Some(y)) if !y.is_finite() => return Err(ValidationError::NonFinite("baseline_yield_kg")),
        (_, Some(y)) if y < 0.0 => return Err(ValidationError::Negative("baseline_yield_kg")),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{AltitudeBand, CropFilter, CropType};
    use crate::scenario::{AgricultureParams, EnergyParams, WaterParams};
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn energy(start: NaiveDate, end: NaiveDate) -> ScenarioParameters {
        ScenarioParameters::Energy(EnergyParams {
            period: DateRange::new(start, end),
            solar_growth_pct: 150.0,
            demand_growth_pct: 0.0,
            rainfall_change_pct: 0.0,
        })
    }

    fn record() -> BaselineRecord {
        BaselineRecord {
            region_id: RegionId(1),
            date: d(2024, 1, 1),
            rainfall_mm: 90.0,
            temperature_c: 22.0,
            soil_moisture_pct: 50.0,
            energy_demand_kwh: 1000.0,
            solar_capacity_factor: 0.2,
            water_demand_m3: 500.0,
            water_supply_m3: 550.0,
            crop_type: None,
            baseline_yield_kg: None,
        }
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = validate_scenario(&energy(d(2024, 2, 1), d(2024, 1, 1))).unwrap_err();
        assert!(matches!(err, ValidationError::InvertedRange { .. }));
        assert!(validate_scenario(&energy(d(2024, 1, 1), d(2024, 1, 1))).is_ok());
    }

    #[test]
    fn overlong_range_is_rejected() {
        let err = validate_scenario(&energy(d(2000, 1, 1), d(2030, 1, 1))).unwrap_err();
        assert!(matches!(err, ValidationError::RangeTooLong(_)));
    }

    #[test]
    fn conservation_above_hundred_is_rejected() {
        let p = ScenarioParameters::Water(WaterParams {
            period: DateRange::new(d(2024, 1, 1), d(2024, 1, 31)),
            water_demand_growth_pct: 10.0,
            conservation_rate_pct: 120.0,
            rainfall_change_pct: 0.0,
        });
        assert_eq!(
            validate_scenario(&p),
            Err(ValidationError::OutOfRange {
                field: "conservation_rate_pct",
                value: 120.0,
                min: 0.0,
                max: 100.0
            })
        );
    }

    #[test]
    fn nan_temperature_is_non_finite() {
        let p = ScenarioParameters::Agriculture(AgricultureParams {
            period: DateRange::new(d(2024, 1, 1), d(2024, 1, 31)),
            rainfall_change_pct: 0.0,
            temperature_change_c: f64::NAN,
            irrigation_improvement_pct: 0.0,
            crop_type: CropFilter::All,
        });
        assert_eq!(
            validate_scenario(&p),
            Err(ValidationError::NonFinite("temperature_change_c"))
        );
    }

    #[test]
    fn region_name_must_not_be_blank() {
        let r = Region {
            id: RegionId(7),
            name: "  ".into(),
            localized_name: "x".into(),
            altitude_band: AltitudeBand::Low,
        };
        assert_eq!(validate_region(&r), Err(ValidationError::EmptyRegionName(RegionId(7))));
    }

    #[test]
    fn baseline_record_checks() {
        assert!(validate_baseline_record(&record()).is_ok());
        let mut r = record();
        r.energy_demand_kwh = f64::INFINITY;
        assert_eq!(
            validate_baseline_record(&r),
            Err(ValidationError::NonFinite("energy_demand_kwh"))
        );
        let mut r = record();
        r.water_supply_m3 = -1.0;
        assert_eq!(
            validate_baseline_record(&r),
            Err(ValidationError::Negative("water_supply_m3"))
        );
        let mut r = record();
        r.crop_type = Some(CropType::Corn);
        assert_eq!(
            validate_baseline_record(&r),
            Err(ValidationError::MissingYield(RegionId(1)))
        );
    }

    proptest! {
        #[test]
        fn in_range_energy_params_validate(solar in -100.0f64..500.0,
                                           demand in -100.0f64..500.0,
                                           rain in -100.0f64..200.0) {
            let p = ScenarioParameters::Energy(EnergyParams {
                period: DateRange::new(d(2024, 1, 1), d(2024, 12, 31)),
                solar_growth_pct: solar,
                demand_growth_pct: demand,
                rainfall_change_pct: rain,
            });
            prop_assert!(validate_scenario(&p).is_ok());
        }
    }
}
