//! The simulator capability boundary.
//!
//! The sweep runner only sees the [`Simulator`] trait: one call per
//! combination, returning either the raw result texts or the reason the
//! point produced none. How the capability is realized (a live browser
//! session in [`trebuchet`], a scripted fake in tests) is invisible to it.

use thiserror::Error;

use crate::domain::ParameterSet;

pub mod parse;
pub mod trebuchet;

/// Raw result-field texts as scraped, before unit-aware parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutcome {
    pub max_distance: String,
    pub energy_efficiency: String,
    pub range_efficiency: String,
    pub release_velocity: String,
}

/// Why a submission produced no outcome.
#[derive(Debug, Error)]
pub enum SimError {
    /// Results did not appear within the wait budget. Costs only the current
    /// combination; the run continues.
    #[error("no results after {0}s")]
    Timeout(u64),
    /// The simulator rejected the configuration (its error field was
    /// non-empty). Costs only the current combination.
    #[error("rejected by simulator: {0}")]
    Rejected(String),
    /// The driving session itself failed; nothing after this can be trusted.
    #[error("driver failure: {0}")]
    Driver(String),
}

/// One shot of the external simulator.
pub trait Simulator {
    /// Submit a fully specified input set and scrape the raw result texts.
    fn submit(&mut self, inputs: &ParameterSet) -> Result<RawOutcome, SimError>;
}
