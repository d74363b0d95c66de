//! Error types raised while advancing a simulation.
//!
//! Configuration problems are reported by the engine crate when
//! parameters are validated. Everything that can go wrong *after* a
//! successful prepare lives here, split into two families:
//!
//! - **Sequencing** violations: the caller drove the lifecycle out of
//!   order (stepping before prepare, running past the step budget,
//!   running a finalized simulation).
//! - **Numerical** failures: the field left the legal state space. These
//!   signal a parameter regime or `dt` incompatible with the splitting
//!   scheme and are never silently clamped away.

use crate::EpochId;
use std::error::Error;
use std::fmt;

/// Errors from advancing the integrator or a simulation driver.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// `step()` or `run()` was called before a successful `prepare()`.
    NotPrepared,
    /// `run()` was called after `postprocess()` finalized the run.
    AlreadyFinalized,
    /// The requested number of steps exceeds the remaining budget.
    StepBudgetExceeded {
        /// Steps requested by the caller.
        requested: u64,
        /// Steps still available before the configured end of the run.
        remaining: u64,
    },
    /// A cell density exceeded the configured divergence bound.
    DensityDiverged {
        /// Flat index of the first offending cell.
        cell: usize,
        /// The offending value.
        value: f64,
        /// Epoch at which the divergence was detected.
        epoch: EpochId,
    },
    /// A cell density became NaN or infinite.
    NonFiniteDensity {
        /// Flat index of the first offending cell.
        cell: usize,
        /// Epoch at which the value was detected.
        epoch: EpochId,
    },
    /// The stochastic sub-step could not draw from its distributions.
    SamplingFailed {
        /// Flat index of the cell being updated.
        cell: usize,
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl StepError {
    /// Returns `true` if the error reports a lifecycle ordering violation.
    pub fn is_sequencing(&self) -> bool {
        matches!(
            self,
            Self::NotPrepared | Self::AlreadyFinalized | Self::StepBudgetExceeded { .. }
        )
    }

    /// Returns `true` if the error reports a numerical instability.
    pub fn is_numerical(&self) -> bool {
        !self.is_sequencing()
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPrepared => write!(f, "integrator stepped before prepare()"),
            Self::AlreadyFinalized => {
                write!(f, "run already finalized; call prepare() to start a new one")
            }
            Self::StepBudgetExceeded {
                requested,
                remaining,
            } => write!(
                f,
                "requested {requested} steps but only {remaining} remain in the run"
            ),
            Self::DensityDiverged { cell, value, epoch } => write!(
                f,
                "density diverged at cell {cell} (value {value:e}) in epoch {epoch}"
            ),
            Self::NonFiniteDensity { cell, epoch } => {
                write!(f, "non-finite density at cell {cell} in epoch {epoch}")
            }
            Self::SamplingFailed { cell, reason } => {
                write!(f, "stochastic update failed at cell {cell}: {reason}")
            }
        }
    }
}

impl Error for StepError {}
