//! Parameter sweeps over (temperature, density).
//!
//! A sweep walks the temperature range in the outer loop and the density
//! range in the inner one. [`SweepIter`] solves lazily and in order, reusing a
//! single session so the spectral solver starts each point from its
//! neighbour; [`execute_sweep_parallel`] solves independent points on the
//! rayon pool.

pub mod error;
pub mod executor;
pub mod plan;
pub mod progress;

pub use error::{SweepError, SweepResult};
pub use executor::{
    SweepIter, SweepOutcome, SweepPointResult, execute_sweep, execute_sweep_parallel, solve_point,
};
pub use plan::{SweepPlan, solve_config};
pub use progress::SweepProgress;
