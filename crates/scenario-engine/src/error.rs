//! Engine error taxonomy.

use chrono::NaiveDate;
use scenario_core::{ProviderError, RegionId, ValidationError};
use scenario_econ::EconError;
use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

/// Coarse classification so callers can tell bad input from missing data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    DataUnavailable,
    Computation,
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// Parameters violate a domain invariant; nothing was computed.
    #[error("invalid scenario input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The provider returned no regions or an incomplete date range.
    #[error("baseline data unavailable: {reason}")]
    DataUnavailable { reason: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A kernel hit a malformed value; the whole run is aborted.
    #[error("computation failed for region {region_id} on {date}: {reason}")]
    Computation {
        region_id: RegionId,
        date: NaiveDate,
        reason: String,
    },

    #[error("economic analysis failed: {0}")]
    Economics(#[from] EconError),
}

impl EngineError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        EngineError::DataUnavailable {
            reason: reason.into(),
        }
    }

    pub fn computation(region_id: RegionId, date: NaiveDate, reason: impl Into<String>) -> Self {
        EngineError::Computation {
            region_id,
            date,
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EngineError::InvalidInput(_) => ErrorCategory::Input,
            EngineError::DataUnavailable { .. } | EngineError::Provider(_) => {
                ErrorCategory::DataUnavailable
            }
            EngineError::Computation { .. } | EngineError::Economics(_) => {
                ErrorCategory::Computation
            }
        }
    }
}
