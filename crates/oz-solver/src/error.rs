//! Error types for solver operations.

use oz_core::OzError;
use thiserror::Error;

/// Errors that can occur while configuring or running a solve.
///
/// Non-convergence is not an error; it is reported through
/// [`SolverStatus`](crate::SolverStatus).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Core error: {0}")]
    Core(#[from] OzError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    pub(crate) fn config(what: impl Into<String>) -> Self {
        Self::InvalidConfig { what: what.into() }
    }
}

impl From<SolverError> for OzError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::ProblemSetup { what } => OzError::InvalidArg {
                what: format!("problem setup: {what}"),
            },
            SolverError::InvalidConfig { what } => OzError::InvalidArg { what },
            SolverError::Numeric { what: _ } => OzError::Invariant { what: "numeric" },
            SolverError::Core(inner) => inner,
        }
    }
}
