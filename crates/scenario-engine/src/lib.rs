#![deny(warnings)]

//! Regional scenario engine.
//!
//! Projects energy, water or agriculture stress for every region and day of
//! a scenario window from a baseline snapshot, then summarizes the run and
//! prices the response. Everything past the provider fetch is synchronous and
//! deterministic: the same snapshot and parameters always give the same
//! output.

pub mod aggregate;
pub mod baseline;
pub mod config;
pub mod constants;
pub mod crops;
pub mod error;
pub mod kernels;
pub mod runner;

#[cfg(test)]
mod testutil;

pub use aggregate::summarize;
pub use baseline::BaselineIndex;
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult, ErrorCategory};
pub use runner::{baseline_query, run_scenario, simulate, SimulationOutput};
