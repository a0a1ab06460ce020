//! Baseline fixtures shared by the engine tests.

use chrono::NaiveDate;
use scenario_core::{
    AltitudeBand, BaselineRecord, BaselineSnapshot, CropType, DateRange, Region, RegionId,
};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn region(id: u32, band: AltitudeBand) -> Region {
    Region {
        id: RegionId(id),
        name: format!("Region {id}"),
        localized_name: format!("Región {id}"),
        altitude_band: band,
    }
}

/// A neutral baseline day: in-band climate for every crop, no deficits.
pub fn neutral_record(region_id: RegionId, date: NaiveDate, crop: Option<CropType>) -> BaselineRecord {
    BaselineRecord {
        region_id,
        date,
        rainfall_mm: 100.0,
        temperature_c: 25.0,
        soil_moisture_pct: 50.0,
        energy_demand_kwh: 1_000_000.0,
        solar_capacity_factor: 0.2,
        water_demand_m3: 80_000.0,
        water_supply_m3: 100_000.0,
        crop_type: crop,
        baseline_yield_kg: crop.map(|_| 1_000.0),
    }
}

/// Regional rows plus one row per crop for every region and day of `period`,
/// each passed through `tweak` before insertion.
pub fn snapshot(
    regions: &[Region],
    period: DateRange,
    tweak: impl Fn(&mut BaselineRecord),
) -> BaselineSnapshot {
    let mut records = Vec::new();
    for r in regions {
        for date in period.days() {
            let mut regional = neutral_record(r.id, date, None);
            tweak(&mut regional);
            records.push(regional);
            for crop in CropType::ALL {
                let mut row = neutral_record(r.id, date, Some(crop));
                tweak(&mut row);
                records.push(row);
            }
        }
    }
    BaselineSnapshot {
        regions: regions.to_vec(),
        records,
    }
}
