//! Boundary to the regional baseline data source.
//!
//! The engine only ever reads baseline data through [`BaselineProvider`]; the
//! fetch is the single asynchronous step of a run. [`InMemoryBaseline`] serves
//! a fixed snapshot and backs tests and demos.

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

use crate::dates::DateRange;
use crate::region::{BaselineRecord, CropFilter, CropType, Region, RegionId};
use crate::scenario::{Domain, ScenarioParameters};

/// Failure of the baseline backend itself (as opposed to missing rows).
#[derive(Debug, Error, PartialEq)]
pub enum ProviderError {
    #[error("baseline backend error: {0}")]
    Backend(String),
    #[error("baseline source unavailable: {0}")]
    Unavailable(String),
}

/// What a run needs from the provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaselineQuery {
    pub domain: Domain,
    pub period: DateRange,
    /// Crop rows to include; only meaningful for agriculture.
    pub crop_filter: Option<CropFilter>,
    /// Restrict to these regions; `None` selects every known region.
    pub region_ids: Option<Vec<RegionId>>,
}

impl BaselineQuery {
    pub fn for_scenario(params: &ScenarioParameters) -> Self {
        Self {
            domain: params.domain(),
            period: params.period(),
            crop_filter: params.crop_filter(),
            region_ids: None,
        }
    }

    pub fn with_regions(mut self, ids: Vec<RegionId>) -> Self {
        self.region_ids = Some(ids);
        self
    }

    /// Crops whose rows are requested; empty for energy and water.
    pub fn crops(&self) -> Vec<CropType> {
        match (self.domain, self.crop_filter) {
            (Domain::Agriculture, Some(f)) => f.crops(),
            (Domain::Agriculture, None) => CropFilter::All.crops(),
            _ => Vec::new(),
        }
    }

    /// Rows a complete answer contains for `region_count` regions.
    pub fn expected_rows(&self, region_count: usize) -> usize {
        let per_day = self.crops().len().max(1);
        region_count * self.period.day_count() * per_day
    }

    pub fn selects_region(&self, id: RegionId) -> bool {
        self.region_ids
            .as_ref()
            .map_or(true, |ids| ids.contains(&id))
    }

    /// Whether a row belongs in the answer to this query.
    pub fn selects_record(&self, r: &BaselineRecord) -> bool {
        if !self.period.contains(r.date) || !self.selects_region(r.region_id) {
            return false;
        }
        match (self.domain, r.crop_type) {
            (Domain::Agriculture, Some(c)) => self.crop_filter.unwrap_or_default().matches(c),
            (Domain::Agriculture, None) => false,
            (_, crop) => crop.is_none(),
        }
    }
}

/// Regions plus their baseline rows, as returned by a provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineSnapshot {
    pub regions: Vec<Region>,
    pub records: Vec<BaselineRecord>,
}

impl BaselineSnapshot {
    /// The subset of this snapshot answering `query`.
    pub fn select(&self, query: &BaselineQuery) -> BaselineSnapshot {
        let regions = self
            .regions
            .iter()
            .filter(|r| query.selects_region(r.id))
            .cloned()
            .collect();
        let records = self
            .records
            .iter()
            .filter(|r| query.selects_record(r))
            .cloned()
            .collect();
        BaselineSnapshot { regions, records }
    }
}

/// Source of baseline regional time series.
pub trait BaselineProvider {
    fn fetch(
        &self,
        query: &BaselineQuery,
    ) -> impl Future<Output = Result<BaselineSnapshot, ProviderError>> + Send;
}

/// Provider over a snapshot held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryBaseline {
    snapshot: BaselineSnapshot,
}

impl InMemoryBaseline {
    pub fn new(snapshot: BaselineSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &BaselineSnapshot {
        &self.snapshot
    }
}

impl BaselineProvider for InMemoryBaseline {
    fn fetch(
        &self,
        query: &BaselineQuery,
    ) -> impl Future<Output = Result<BaselineSnapshot, ProviderError>> + Send {
        let selected = self.snapshot.select(query);
        tracing::debug!(
            regions = selected.regions.len(),
            records = selected.records.len(),
            "in-memory baseline fetch"
        );
        async move { Ok(selected) }
    }
}
