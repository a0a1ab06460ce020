use criterion::{criterion_group, criterion_main, Criterion};
use scenario_core::{
    AgricultureParams, AltitudeBand, BaselineRecord, BaselineSnapshot, CropFilter, CropType,
    DateRange, EnergyParams, Region, RegionId, ScenarioParameters,
};
use scenario_engine::{simulate, EngineConfig};
use std::hint::black_box;

fn year_snapshot(regions: u32) -> (BaselineSnapshot, DateRange) {
    let period = DateRange::new(
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
    );
    let regions: Vec<Region> = (1..=regions)
        .map(|i| Region {
            id: RegionId(i),
            name: format!("Region {i}"),
            localized_name: format!("Región {i}"),
            altitude_band: AltitudeBand::Medium,
        })
        .collect();
    let mut records = Vec::new();
    for r in &regions {
        for (n, date) in period.days().enumerate() {
            let row = BaselineRecord {
                region_id: r.id,
                date,
                rainfall_mm: 60.0 + (n % 30) as f64 * 3.0,
                temperature_c: 22.0,
                soil_moisture_pct: 50.0,
                energy_demand_kwh: 1_000_000.0,
                solar_capacity_factor: 0.2,
                water_demand_m3: 80_000.0,
                water_supply_m3: 90_000.0,
                crop_type: None,
                baseline_yield_kg: None,
            };
            for crop in CropType::ALL {
                records.push(BaselineRecord {
                    crop_type: Some(crop),
                    baseline_yield_kg: Some(1_000.0),
                    ..row.clone()
                });
            }
            records.push(row);
        }
    }
    (BaselineSnapshot { regions, records }, period)
}

fn bench_runs(c: &mut Criterion) {
    let (snapshot, period) = year_snapshot(10);
    let cfg = EngineConfig::default();
    let energy = ScenarioParameters::Energy(EnergyParams {
        period,
        solar_growth_pct: 150.0,
        demand_growth_pct: 20.0,
        rainfall_change_pct: -10.0,
    });
    let agriculture = ScenarioParameters::Agriculture(AgricultureParams {
        period,
        rainfall_change_pct: -30.0,
        temperature_change_c: 2.5,
        irrigation_improvement_pct: 20.0,
        crop_type: CropFilter::All,
    });
    c.bench_function("energy_year_10_regions", |b| {
        b.iter(|| {
            let _ = simulate(black_box(&snapshot), &energy, &cfg);
        })
    });
    c.bench_function("agriculture_year_10_regions", |b| {
        b.iter(|| {
            let _ = simulate(black_box(&snapshot), &agriculture, &cfg);
        })
    });
}

criterion_group!(benches, bench_runs);
criterion_main!(benches);
