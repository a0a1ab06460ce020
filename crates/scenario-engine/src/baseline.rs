//! Lookup table over a provider snapshot, with coverage checks.

use chrono::NaiveDate;
use scenario_core::{BaselineQuery, BaselineRecord, BaselineSnapshot, CropType, DateRange, Region, RegionId};
use std::collections::{BTreeSet, HashMap};

use crate::error::{EngineError, EngineResult};

type RowKey = (RegionId, NaiveDate, Option<CropType>);

/// Baseline rows of one run keyed by (region, date, crop).
///
/// Building the index verifies that every region has a row for every day
/// (and every requested crop), so kernels never run on a partial range.
#[derive(Debug)]
pub struct BaselineIndex<'a> {
    regions: Vec<&'a Region>,
    period: DateRange,
    crops: Vec<CropType>,
    rows: HashMap<RowKey, &'a BaselineRecord>,
}

impl<'a> BaselineIndex<'a> {
    pub fn build(snapshot: &'a BaselineSnapshot, query: &BaselineQuery) -> EngineResult<Self> {
        let mut seen = BTreeSet::new();
        let mut regions: Vec<&Region> = snapshot
            .regions
            .iter()
            .filter(|r| query.selects_region(r.id))
            .filter(|r| seen.insert(r.id))
            .collect();
        regions.sort_by_key(|r| r.id);
        if regions.is_empty() {
            return Err(EngineError::unavailable(
                "baseline provider returned no regions",
            ));
        }

        let mut rows = HashMap::new();
        let mut matching = 0usize;
        for rec in &snapshot.records {
            if !seen.contains(&rec.region_id) || !query.selects_record(rec) {
                continue;
            }
            matching += 1;
            rows.entry((rec.region_id, rec.date, rec.crop_type))
                .or_insert(rec);
        }

        let expected = query.expected_rows(regions.len());
        if matching < expected {
            return Err(EngineError::unavailable(format!(
                "expected {expected} baseline rows for {} regions over {} days, got {matching}",
                regions.len(),
                query.period.day_count()
            )));
        }

        let index = Self {
            regions,
            period: query.period,
            crops: query.crops(),
            rows,
        };
        index.check_coverage()?;
        Ok(index)
    }

    fn check_coverage(&self) -> EngineResult<()> {
        for region in &self.regions {
            for date in self.period.days() {
                if self.crops.is_empty() {
                    self.require(region.id, date, None)?;
                }
                for &crop in &self.crops {
                    self.require(region.id, date, Some(crop))?;
                }
            }
        }
        Ok(())
    }

    /// Regions of the run in ascending id order.
    pub fn regions(&self) -> &[&'a Region] {
        &self.regions
    }

    pub fn period(&self) -> DateRange {
        self.period
    }

    /// Crops of an agriculture run in reporting order; empty otherwise.
    pub fn crops(&self) -> &[CropType] {
        &self.crops
    }

    pub fn get(&self, region: RegionId, date: NaiveDate, crop: Option<CropType>) -> Option<&'a BaselineRecord> {
        self.rows.get(&(region, date, crop)).copied()
    }

    pub fn require(
        &self,
        region: RegionId,
        date: NaiveDate,
        crop: Option<CropType>,
    ) -> EngineResult<&'a BaselineRecord> {
        self.get(region, date, crop).ok_or_else(|| match crop {
            Some(c) => EngineError::unavailable(format!(
                "no {c} baseline for region {region} on {date}"
            )),
            None => EngineError::unavailable(format!("no baseline for region {region} on {date}")),
        })
    }

    /// Number of result rows a run over this index produces.
    pub fn result_len(&self) -> usize {
        self.regions.len() * self.period.day_count() * self.crops.len().max(1)
    }
}
