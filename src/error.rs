//! Structured error type for the scheduler's failure and warning conditions.
//!
//! `Timeout` and `NoImprovement` are not represented here: they're normal
//! termination outcomes, surfaced as [`crate::engine::TerminationReason`] on
//! an `Ok` result rather than as errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedError {
    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("no legal instruction for any non-empty ready-list entry: region is infeasible under the given machine model")]
    InfeasibleRegion,

    /// Never returned to a caller as a hard failure; `log::warn!`-logged at
    /// the point the ready list grows past its initial heuristic capacity.
    #[error("ready list grew past its initial capacity of {0} entries")]
    ReadyListOverflow(usize),
}
