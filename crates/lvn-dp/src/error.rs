//! Error type for [`SimDP`](crate::SimDP) operations.

use std::error::Error;
use std::fmt;

use lvn_core::StepError;
use lvn_engine::ConfigError;

/// A run failed either while preparing or while stepping.
#[derive(Debug, PartialEq)]
pub enum SimError {
    /// Parameters were rejected by `prepare()`.
    Config(ConfigError),
    /// A lifecycle or numerical failure during `run()` or `postprocess()`.
    Step(StepError),
}

impl SimError {
    /// The wrapped [`StepError`], if any.
    pub fn as_step(&self) -> Option<&StepError> {
        match self {
            Self::Step(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Step(e) => write!(f, "step error: {e}"),
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Step(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StepError> for SimError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}
