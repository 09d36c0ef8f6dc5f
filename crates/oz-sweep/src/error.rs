use oz_solver::SolverError;
use thiserror::Error;

/// Errors that abort a sweep.
///
/// Non-converged points are not errors; they are reported per point and the
/// sweep moves on.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Solver error at point {point_index}: {source}")]
    Solver {
        point_index: usize,
        #[source]
        source: SolverError,
    },

    #[error("Project error: {0}")]
    Project(#[from] oz_project::ProjectError),
}

pub type SweepResult<T> = Result<T, SweepError>;
