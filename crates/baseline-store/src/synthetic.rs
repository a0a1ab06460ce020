//! Seeded synthetic baseline for demos and tests.
//!
//! The series are plausible, not realistic: a seasonal cycle per altitude
//! band plus bounded noise from a ChaCha8 stream. The same seed, regions and
//! period always give the same snapshot.

use chrono::Datelike;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scenario_core::{
    AltitudeBand, BaselineRecord, BaselineSnapshot, CropType, DateRange, Region, RegionId,
};
use std::f64::consts::TAU;

/// Regions used by the demo run file.
pub fn demo_regions() -> Vec<Region> {
    [
        (1, "Northern Highlands", "Altiplano Norte", AltitudeBand::High),
        (2, "Central Valley", "Valle Central", AltitudeBand::Medium),
        (3, "Pacific Coast", "Costa Pacífica", AltitudeBand::Low),
        (4, "Caribbean Lowlands", "Llanuras del Caribe", AltitudeBand::Low),
        (5, "Southern Mountains", "Montañas del Sur", AltitudeBand::High),
        (6, "Western Plateau", "Meseta Occidental", AltitudeBand::Medium),
    ]
    .into_iter()
    .map(|(id, name, localized, band)| Region {
        id: RegionId(id),
        name: name.to_string(),
        localized_name: localized.to_string(),
        altitude_band: band,
    })
    .collect()
}

/// Mean daily rainfall (mm) and temperature (°C) of a band.
fn climate_normals(band: AltitudeBand) -> (f64, f64) {
    match band {
        AltitudeBand::Low => (120.0, 27.0),
        AltitudeBand::Medium => (100.0, 22.0),
        AltitudeBand::High => (90.0, 17.0),
    }
}

fn typical_yield_kg(crop: CropType) -> f64 {
    match crop {
        CropType::Coffee => 800.0,
        CropType::SugarCane => 5_000.0,
        CropType::Corn => 2_500.0,
        CropType::Beans => 1_200.0,
    }
}

/// Scale of one region, drawn once so regions differ in size.
struct RegionScale {
    energy_kwh: f64,
    water_m3: f64,
    supply_margin: f64,
    farmland: f64,
}

impl RegionScale {
    fn draw(rng: &mut ChaCha8Rng) -> Self {
        Self {
            energy_kwh: rng.gen_range(600_000.0..1_500_000.0),
            water_m3: rng.gen_range(50_000.0..120_000.0),
            supply_margin: rng.gen_range(1.05..1.35),
            farmland: rng.gen_range(0.6..1.4),
        }
    }
}

/// Regional rows plus one row per crop for every region and day of `period`.
pub fn generate(regions: &[Region], period: DateRange, seed: u64) -> BaselineSnapshot {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(regions.len() * period.day_count() * (CropType::ALL.len() + 1));

    for region in regions {
        let scale = RegionScale::draw(&mut rng);
        let (rain_normal, temp_normal) = climate_normals(region.altitude_band);
        for date in period.days() {
            // Wet season peaks mid-year.
            let season = (TAU * (f64::from(date.ordinal()) - 80.0) / 365.0).sin();
            let rainfall_mm = (rain_normal * (1.0 + 0.5 * season) + rng.gen_range(-25.0..25.0)).max(0.0);
            let temperature_c = temp_normal + 2.0 * season + rng.gen_range(-1.5..1.5);
            let water_demand_m3 = scale.water_m3 * (1.0 - 0.1 * season) * rng.gen_range(0.95..1.05);
            let regional = BaselineRecord {
                region_id: region.id,
                date,
                rainfall_mm,
                temperature_c,
                soil_moisture_pct: (45.0 + 15.0 * season + rng.gen_range(-5.0..5.0)).clamp(20.0, 85.0),
                energy_demand_kwh: scale.energy_kwh * (1.0 + 0.08 * season) * rng.gen_range(0.97..1.03),
                solar_capacity_factor: (0.2 - 0.04 * season + rng.gen_range(-0.02..0.02)).clamp(0.0, 1.0),
                water_demand_m3,
                water_supply_m3: water_demand_m3 * scale.supply_margin * (1.0 + 0.15 * season),
                crop_type: None,
                baseline_yield_kg: None,
            };
            for crop in CropType::ALL {
                let yield_kg = typical_yield_kg(crop) * scale.farmland * rng.gen_range(0.9..1.1);
                records.push(BaselineRecord {
                    crop_type: Some(crop),
                    baseline_yield_kg: Some(yield_kg),
                    ..regional.clone()
                });
            }
            records.push(regional);
        }
    }

    tracing::debug!(
        regions = regions.len(),
        records = records.len(),
        seed,
        "generated synthetic baseline"
    );
    BaselineSnapshot {
        regions: regions.to_vec(),
        records,
    }
}
