//! oz-core: stable foundation for the Ornstein-Zernike liquid solver.
//!
//! Contains:
//! - error (shared error types)
//! - numeric (Real + tolerances + float helpers)
//! - kinds (closure, potential and solution-method selectors)
//! - grid (uniform radial grid)
//! - potential (per-grid-point pair potential tables)

pub mod error;
pub mod grid;
pub mod kinds;
pub mod numeric;
pub mod potential;

// Re-exports: nice ergonomics for downstream crates
pub use error::{OzError, OzResult};
pub use grid::Grid;
pub use kinds::{ClosureKind, PotentialKind, SolutionMethod};
pub use numeric::*;
pub use potential::PotentialTables;
