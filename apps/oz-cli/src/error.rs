//! Error type for the command line front end.

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Config error: {0}")]
    Project(#[from] oz_project::ProjectError),

    #[error("Solver error: {0}")]
    Solver(#[from] oz_solver::SolverError),

    #[error("Sweep error: {0}")]
    Sweep(#[from] oz_sweep::SweepError),

    #[error("Results error: {0}")]
    Results(#[from] oz_results::ResultsError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type CliResult<T> = Result<T, CliError>;
