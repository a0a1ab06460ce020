//! Run orchestration: validate, fetch, compute, summarize, price.

use scenario_core::{
    validate_scenario, BaselineProvider, BaselineQuery, BaselineSnapshot, DailyResult, Domain,
    ScenarioParameters, SimulationSummary,
};
use scenario_econ::EconomicAnalysis;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::summarize;
use crate::baseline::BaselineIndex;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::kernels::run_domain;

/// Result bundle of one scenario run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub domain: Domain,
    /// Ordered by date, then region id, then crop.
    pub daily_results: Vec<DailyResult>,
    pub summary: SimulationSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economic_analysis: Option<EconomicAnalysis>,
}

/// Query a run of `params` sends to the provider.
pub fn baseline_query(params: &ScenarioParameters, config: &EngineConfig) -> BaselineQuery {
    let query = BaselineQuery::for_scenario(params);
    match &config.region_ids {
        Some(ids) => query.with_regions(ids.clone()),
        None => query,
    }
}

/// Synchronous part of a run over an already fetched snapshot.
pub fn simulate(
    snapshot: &BaselineSnapshot,
    params: &ScenarioParameters,
    config: &EngineConfig,
) -> EngineResult<SimulationOutput> {
    validate_scenario(params)?;
    let domain = params.domain();
    let query = baseline_query(params, config);
    let index = BaselineIndex::build(snapshot, &query)?;
    info!(
        %domain,
        regions = index.regions().len(),
        days = index.period().day_count(),
        "simulation started"
    );

    let daily_results = run_domain(&index, params)?;
    let summary = summarize(domain, &daily_results, config);
    let economic_analysis = if config.include_economics {
        Some(scenario_econ::analyze(&summary, domain)?)
    } else {
        None
    };

    info!(
        %domain,
        records = summary.record_count,
        avg_stress = summary.avg_stress,
        max_stress = summary.max_stress,
        "simulation finished"
    );
    Ok(SimulationOutput {
        domain,
        daily_results,
        summary,
        economic_analysis,
    })
}

/// Full run: the provider fetch is the only await point.
pub async fn run_scenario<P: BaselineProvider>(
    provider: &P,
    params: &ScenarioParameters,
    config: &EngineConfig,
) -> EngineResult<SimulationOutput> {
    // Fail before touching the backend on malformed input.
    validate_scenario(params)?;
    let query = baseline_query(params, config);
    let snapshot = provider.fetch(&query).await?;
    simulate(&snapshot, params, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, ErrorCategory};
    use crate::testutil::{d, region, snapshot};
    use scenario_core::{
        AgricultureParams, AltitudeBand, CropFilter, CropType, DateRange, EnergyParams,
        InMemoryBaseline, ProviderError, RegionId, WaterParams,
    };
    use std::future::Future;

    fn period() -> DateRange {
        DateRange::new(d(2024, 1, 1), d(2024, 1, 31))
    }

    fn demo_snapshot() -> BaselineSnapshot {
        let regions = [
            region(3, AltitudeBand::High),
            region(1, AltitudeBand::Low),
            region(2, AltitudeBand::Medium),
        ];
        snapshot(&regions, period(), |r| {
            r.rainfall_mm = 40.0 + 10.0 * f64::from(r.region_id.0);
        })
    }

    fn water(growth: f64, conservation: f64) -> ScenarioParameters {
        ScenarioParameters::Water(WaterParams {
            period: period(),
            water_demand_growth_pct: growth,
            conservation_rate_pct: conservation,
            rainfall_change_pct: -20.0,
        })
    }

    fn agriculture() -> ScenarioParameters {
        ScenarioParameters::Agriculture(AgricultureParams {
            period: period(),
            rainfall_change_pct: -25.0,
            temperature_change_c: 1.5,
            irrigation_improvement_pct: 10.0,
            crop_type: CropFilter::All,
        })
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let snap = demo_snapshot();
        let cfg = EngineConfig::default();
        let a = simulate(&snap, &agriculture(), &cfg).unwrap();
        let b = simulate(&snap, &agriculture(), &cfg).unwrap();
        assert_eq!(
            serde_json::to_string(&a.daily_results).unwrap(),
            serde_json::to_string(&b.daily_results).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&a.summary).unwrap(),
            serde_json::to_string(&b.summary).unwrap()
        );
    }

    #[test]
    fn results_are_ordered_by_date_region_crop() {
        let out = simulate(&demo_snapshot(), &agriculture(), &EngineConfig::default()).unwrap();
        assert_eq!(out.daily_results.len(), 31 * 3 * 4);
        let keys: Vec<_> = out
            .daily_results
            .iter()
            .map(|r| (r.date, r.region_id, r.detail.crop()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys[0], (d(2024, 1, 1), RegionId(1), Some(CropType::Coffee)));
        assert!(out.daily_results.iter().all(|r| (0.0..=1.0).contains(&r.stress)));
    }

    #[test]
    fn summary_and_economics_are_attached() {
        let out = simulate(&demo_snapshot(), &water(40.0, 0.0), &EngineConfig::default()).unwrap();
        assert_eq!(out.domain, Domain::Water);
        assert_eq!(out.summary.record_count, 31 * 3);
        assert_eq!(out.summary.top_stressed_regions.len(), 3);
        assert!(out.economic_analysis.is_some());

        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["domain"], "water");
        assert!(v["summary"]["total_water_deficit_m3"].is_number());
        assert_eq!(v["daily_results"][0]["domain"], "water");
    }

    #[test]
    fn economics_can_be_disabled() {
        let cfg = EngineConfig {
            include_economics: false,
            ..EngineConfig::default()
        };
        let out = simulate(&demo_snapshot(), &water(0.0, 0.0), &cfg).unwrap();
        assert!(out.economic_analysis.is_none());
        let v = serde_json::to_value(&out).unwrap();
        assert!(v.get("economic_analysis").is_none());
    }

    #[test]
    fn region_restriction_limits_output() {
        let cfg = EngineConfig {
            region_ids: Some(vec![RegionId(2)]),
            ..EngineConfig::default()
        };
        let out = simulate(&demo_snapshot(), &water(10.0, 0.0), &cfg).unwrap();
        assert_eq!(out.summary.record_count, 31);
        assert!(out.daily_results.iter().all(|r| r.region_id == RegionId(2)));
    }

    #[test]
    fn inverted_range_is_invalid_input() {
        let params = ScenarioParameters::Energy(EnergyParams {
            period: DateRange::new(d(2024, 2, 1), d(2024, 1, 1)),
            solar_growth_pct: 10.0,
            demand_growth_pct: 10.0,
            rainfall_change_pct: 0.0,
        });
        let err = simulate(&demo_snapshot(), &params, &EngineConfig::default()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn missing_regions_is_data_unavailable() {
        let err = simulate(&BaselineSnapshot::default(), &water(0.0, 0.0), &EngineConfig::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable { .. }));
    }

    #[test]
    fn malformed_baseline_aborts_run() {
        let regions = [region(1, AltitudeBand::Low)];
        let snap = snapshot(&regions, period(), |r| {
            if r.date == d(2024, 1, 15) {
                r.water_demand_m3 = f64::INFINITY;
            }
        });
        let err = simulate(&snap, &water(0.0, 0.0), &EngineConfig::default()).unwrap_err();
        match err {
            EngineError::Computation { region_id, date, .. } => {
                assert_eq!(region_id, RegionId(1));
                assert_eq!(date, d(2024, 1, 15));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[tokio::test]
    async fn runs_against_in_memory_provider() {
        let provider = InMemoryBaseline::new(demo_snapshot());
        let out = run_scenario(&provider, &water(40.0, 100.0), &EngineConfig::default())
            .await
            .unwrap();
        assert_eq!(out.summary.record_count, 31 * 3);
        let direct = simulate(&demo_snapshot(), &water(40.0, 100.0), &EngineConfig::default()).unwrap();
        assert_eq!(out, direct);
    }

    #[tokio::test]
    async fn energy_year_solar_share_climbs_each_month() {
        use chrono::Datelike;
        use scenario_core::DailyDetail;

        let year = DateRange::new(d(2024, 1, 1), d(2024, 12, 31));
        let regions = [region(1, AltitudeBand::Low), region(2, AltitudeBand::High)];
        let provider = InMemoryBaseline::new(snapshot(&regions, year, |_| {}));
        let params = ScenarioParameters::Energy(EnergyParams {
            period: year,
            solar_growth_pct: 150.0,
            demand_growth_pct: 0.0,
            rainfall_change_pct: 0.0,
        });
        let out = run_scenario(&provider, &params, &EngineConfig::default())
            .await
            .unwrap();
        assert_eq!(out.domain, Domain::Energy);
        assert_eq!(out.summary.record_count, 366 * 2);

        for id in [RegionId(1), RegionId(2)] {
            let mut sums = [0.0f64; 12];
            let mut counts = [0usize; 12];
            for r in out.daily_results.iter().filter(|r| r.region_id == id) {
                let DailyDetail::Energy { solar_pct, .. } = r.detail else {
                    panic!("unexpected detail {:?}", r.detail);
                };
                sums[r.date.month0() as usize] += solar_pct;
                counts[r.date.month0() as usize] += 1;
            }
            let first_day = out
                .daily_results
                .iter()
                .find(|r| r.region_id == id)
                .map(|r| match r.detail {
                    DailyDetail::Energy { solar_pct, .. } => solar_pct,
                    _ => f64::NAN,
                })
                .unwrap();
            let means: Vec<f64> = sums.iter().zip(counts).map(|(s, n)| s / n as f64).collect();
            assert!(means.windows(2).all(|w| w[1] > w[0]), "{means:?}");
            assert!(means[0] >= first_day);
            assert!(means[11] > first_day);
        }
    }

    struct FailingProvider;

    impl BaselineProvider for FailingProvider {
        fn fetch(
            &self,
            _query: &BaselineQuery,
        ) -> impl Future<Output = Result<BaselineSnapshot, ProviderError>> + Send {
            async { Err(ProviderError::Unavailable("connection refused".into())) }
        }
    }

    #[tokio::test]
    async fn provider_failure_is_propagated() {
        let err = run_scenario(&FailingProvider, &water(0.0, 0.0), &EngineConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::DataUnavailable);
        assert!(err.to_string().contains("connection refused"));
    }
}
