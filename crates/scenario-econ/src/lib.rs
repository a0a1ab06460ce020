#![deny(warnings)]

//! Economic impact translation for scenario runs.
//!
//! Turns the stress figures of a [`SimulationSummary`] into an investment need
//! and a return-on-investment estimate. The ratios are fixed heuristics and
//! have never been calibrated against real spending; treat the output as an
//! order-of-magnitude indicator for dashboards, not as an economic model.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use scenario_core::{Domain, SimulationSummary};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Regions whose average stress exceeds this need dedicated investment.
pub const STRESSED_REGION_THRESHOLD: f64 = 0.6;
/// Average stress above which a system-wide scaling cost applies.
pub const SYSTEMIC_STRESS_THRESHOLD: f64 = 0.5;
/// USD per unit of average stress above [`SYSTEMIC_STRESS_THRESHOLD`].
pub const SCALING_FACTOR_USD: i64 = 10_000_000;
/// Avoided losses per invested dollar, expressed in tenths (1.8).
pub const LOSS_PREVENTION_MULTIPLIER_TENTHS: i64 = 18;
/// Years over which the avoided losses accrue.
pub const BENEFIT_HORIZON_YEARS: i64 = 10;

/// Errors produced by economic helpers.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    /// Stress figures must be finite and within [0,1].
    #[error("invalid stress value: {0}")]
    InvalidStress(f64),
    /// Numeric conversion to or from decimal failed.
    #[error("non-finite numeric conversion")]
    NonFinite,
}

/// Heuristic cost ratios for one domain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EconomicConstants {
    /// Investment per region above the stress threshold, USD.
    pub base_unit_cost_usd: Decimal,
    pub scaling_factor_usd: Decimal,
    pub loss_prevention_multiplier: Decimal,
    pub benefit_horizon_years: Decimal,
}

impl EconomicConstants {
    /// Ratios used for `domain`: grid upgrades cost the most per region,
    /// irrigation schemes the least.
    pub fn for_domain(domain: Domain) -> Self {
        let base = match domain {
            Domain::Energy => 5_000_000,
            Domain::Water => 3_000_000,
            Domain::Agriculture => 2_000_000,
        };
        Self {
            base_unit_cost_usd: Decimal::new(base, 0),
            scaling_factor_usd: Decimal::new(SCALING_FACTOR_USD, 0),
            loss_prevention_multiplier: Decimal::new(LOSS_PREVENTION_MULTIPLIER_TENTHS, 1),
            benefit_horizon_years: Decimal::new(BENEFIT_HORIZON_YEARS, 0),
        }
    }
}

/// Investment need and expected return derived from a summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EconomicAnalysis {
    #[serde(with = "rust_decimal::serde::float")]
    pub investment_required_usd: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub loss_prevented_usd: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub roi_pct: Decimal,
    /// Years until avoided losses repay the investment; absent without investment.
    #[serde(rename = "payback_period", with = "rust_decimal::serde::float_option", default)]
    pub payback_period_years: Option<Decimal>,
}

fn check_stress(v: f64) -> Result<f64, EconError> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(EconError::InvalidStress(v));
    }
    Ok(v)
}

/// Investment need: a fixed cost per stressed region plus a scaling term for
/// average stress above the systemic threshold. Rounded to cents.
///
/// Example:
/// let c = EconomicConstants::for_domain(Domain::Water);
/// assert_eq!(investment_required(2, 0.5, &c).unwrap(), Decimal::new(6_000_000, 0));
pub fn investment_required(
    stressed_regions: usize,
    avg_stress: f64,
    constants: &EconomicConstants,
) -> Result<Decimal, EconError> {
    let avg = check_stress(avg_stress)?;
    let excess = (avg - SYSTEMIC_STRESS_THRESHOLD).max(0.0);
    let excess_dec = Decimal::from_f64(excess).ok_or(EconError::NonFinite)?;
    let regions = Decimal::from(stressed_regions as u64);
    let total = regions * constants.base_unit_cost_usd + excess_dec * constants.scaling_factor_usd;
    Ok(total.round_dp(2))
}

/// ROI in percent, defined as zero when nothing is invested.
///
/// Example:
/// let roi = roi_pct(Decimal::new(100, 0), Decimal::new(180, 0));
/// assert_eq!(roi, Decimal::new(80, 0));
pub fn roi_pct(investment: Decimal, loss_prevented: Decimal) -> Decimal {
    if investment.is_zero() {
        return Decimal::ZERO;
    }
    ((loss_prevented - investment) / investment * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Years for the annualised avoided losses to repay the investment.
pub fn payback_years(
    investment: Decimal,
    loss_prevented: Decimal,
    constants: &EconomicConstants,
) -> Option<Decimal> {
    if investment.is_zero() || loss_prevented.is_zero() || constants.benefit_horizon_years.is_zero() {
        return None;
    }
    let annual = loss_prevented / constants.benefit_horizon_years;
    Some((investment / annual).round_dp(2))
}

/// Translate a run summary into an economic analysis for `domain`.
pub fn analyze(summary: &SimulationSummary, domain: Domain) -> Result<EconomicAnalysis, EconError> {
    let constants = EconomicConstants::for_domain(domain);
    analyze_with(summary, &constants)
}

/// Same as [`analyze`] with explicit ratios.
pub fn analyze_with(
    summary: &SimulationSummary,
    constants: &EconomicConstants,
) -> Result<EconomicAnalysis, EconError> {
    let investment = investment_required(
        summary.regions_over_threshold,
        summary.avg_stress,
        constants,
    )?;
    let loss_prevented = (investment * constants.loss_prevention_multiplier).round_dp(2);
    let roi = roi_pct(investment, loss_prevented);
    let payback = payback_years(investment, loss_prevented, constants);
    tracing::debug!(
        investment = investment.to_f64().unwrap_or_default(),
        roi = roi.to_f64().unwrap_or_default(),
        "economic analysis"
    );
    Ok(EconomicAnalysis {
        investment_required_usd: investment,
        loss_prevented_usd: loss_prevented,
        roi_pct: roi,
        payback_period_years: payback,
    })
}
