//! Summary statistics over the daily rows of a run.

use scenario_core::numeric::{mean, safe_ratio};
use scenario_core::{
    CropType, DailyResult, Domain, LossBreakdown, RegionId, RegionStress, SimulationSummary,
};
use scenario_econ::STRESSED_REGION_THRESHOLD;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::EngineConfig;

#[derive(Default)]
struct RegionAcc {
    name: String,
    stress_sum: f64,
    rows: usize,
}

impl RegionAcc {
    fn avg(&self) -> f64 {
        safe_ratio(self.stress_sum, self.rows as f64)
    }
}

/// Running loss totals per entity, remembering first-seen order.
struct LossTally<K> {
    order: Vec<K>,
    totals: Vec<f64>,
}

impl<K: PartialEq + Copy> LossTally<K> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            totals: Vec::new(),
        }
    }

    fn add(&mut self, key: K, loss: f64) {
        match self.order.iter().position(|k| *k == key) {
            Some(i) => self.totals[i] += loss,
            None => {
                self.order.push(key);
                self.totals.push(loss);
            }
        }
    }

    /// Entity with the highest total; the earliest one wins a tie. `None`
    /// when nothing was lost.
    fn most_affected(&self) -> Option<K> {
        let mut best: Option<(K, f64)> = None;
        for (k, total) in self.order.iter().zip(&self.totals) {
            if *total <= 0.0 {
                continue;
            }
            if best.map_or(true, |(_, b)| *total > b) {
                best = Some((*k, *total));
            }
        }
        best.map(|(k, _)| k)
    }
}

/// Rank regions by average stress, highest first, ties by ascending id.
pub fn rank_regions(per_region: &BTreeMap<RegionId, RegionStress>, limit: usize) -> Vec<RegionStress> {
    let mut ranked: Vec<RegionStress> = per_region.values().cloned().collect();
    ranked.sort_by(|a, b| {
        b.avg_stress
            .partial_cmp(&a.avg_stress)
            .unwrap_or(Ordering::Equal)
            .then(a.region_id.cmp(&b.region_id))
    });
    ranked.truncate(limit);
    ranked
}

/// Recompute the summary of `rows` from scratch.
pub fn summarize(domain: Domain, rows: &[DailyResult], config: &EngineConfig) -> SimulationSummary {
    let stresses: Vec<f64> = rows.iter().map(|r| r.stress).collect();
    let avg_stress = mean(&stresses);
    let max_stress = stresses.iter().copied().fold(0.0, f64::max);

    let mut regions: BTreeMap<RegionId, RegionAcc> = BTreeMap::new();
    let mut by_region = LossTally::<RegionId>::new();
    let mut by_crop = LossTally::<CropType>::new();
    let mut total_loss = 0.0;
    let mut total_reference = 0.0;

    for r in rows {
        let acc = regions.entry(r.region_id).or_default();
        if acc.rows == 0 {
            acc.name = r.region_name.clone();
        }
        acc.stress_sum += r.stress;
        acc.rows += 1;

        let loss = r.detail.loss();
        total_loss += loss;
        total_reference += r.detail.reference_amount();
        by_region.add(r.region_id, loss);
        if let Some(crop) = r.detail.crop() {
            by_crop.add(crop, loss);
        }
    }

    let loss_pct = safe_ratio(total_loss, total_reference) * 100.0;
    let losses = match domain {
        Domain::Agriculture => LossBreakdown::Yield {
            total_yield_loss_kg: total_loss,
            total_yield_loss_pct: loss_pct,
            most_affected_crop: by_crop.most_affected(),
        },
        Domain::Energy => LossBreakdown::Energy {
            total_energy_deficit_kwh: total_loss,
            total_energy_deficit_pct: loss_pct,
            most_affected_region: by_region.most_affected(),
        },
        Domain::Water => LossBreakdown::Water {
            total_water_deficit_m3: total_loss,
            total_water_deficit_pct: loss_pct,
            most_affected_region: by_region.most_affected(),
        },
    };

    let per_region: BTreeMap<RegionId, RegionStress> = regions
        .into_iter()
        .map(|(id, acc)| {
            let avg_stress = acc.avg();
            (
                id,
                RegionStress {
                    region_id: id,
                    region_name: acc.name,
                    avg_stress,
                },
            )
        })
        .collect();
    let regions_over_threshold = per_region
        .values()
        .filter(|r| r.avg_stress > STRESSED_REGION_THRESHOLD)
        .count();

    SimulationSummary {
        avg_stress,
        max_stress,
        losses,
        top_stressed_regions: rank_regions(&per_region, config.top_stressed_limit),
        regions_over_threshold,
        record_count: rows.len(),
    }
}
