//! Engine configuration.

use scenario_core::RegionId;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TOP_STRESSED_LIMIT;

/// Knobs of a run that are not part of the scenario itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Length of `top_stressed_regions` in the summary.
    pub top_stressed_limit: usize,
    /// Attach an economic analysis to the output.
    pub include_economics: bool,
    /// Restrict the run to these regions; all regions when absent.
    pub region_ids: Option<Vec<RegionId>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_stressed_limit: DEFAULT_TOP_STRESSED_LIMIT,
            include_economics: true,
            region_ids: None,
        }
    }
}
