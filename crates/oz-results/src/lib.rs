//! oz-results: persisted sweep results and the on-disk run store.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::compute_run_id;
pub use store::RunStore;
pub use types::*;

use std::path::Path;

/// Version string recorded with every run and mixed into its id.
pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },
}

/// Write a whole run as one pretty-printed JSON document.
pub fn save_results(path: &Path, record: &RunRecord) -> ResultsResult<()> {
    let content = serde_json::to_string_pretty(record)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_results(path: &Path) -> ResultsResult<RunRecord> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
