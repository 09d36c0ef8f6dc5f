//! Iterative Ornstein-Zernike solver for simple liquids.
//!
//! This crate drives the radial distribution function g(r) and the total
//! correlation function h(r) to self-consistency for one (temperature, density)
//! state point at a time, either with a damped real-space fixed-point iteration
//! or with a sine-transform (LM) scheme whose low harmonics are refined by an
//! inner Newton iteration. Thermodynamic properties are derived from the
//! terminal state.

pub mod cancel;
pub mod closure;
pub mod config;
pub mod correlation;
pub mod error;
pub mod newton;
pub mod real_space;
pub mod session;
pub mod spectral;
pub mod state;
pub mod thermo;
pub mod transform;

pub use cancel::CancelToken;
pub use closure::{ClosureArgs, omega, omega_derivative};
pub use config::{Damping, SolveConfig, SpectralConfig, StatePoint};
pub use correlation::{PointwiseInput, update_h, update_h_into};
pub use error::{SolverError, SolverResult};
pub use newton::{NewtonConfig, NewtonResult, newton_solve};
pub use real_space::RealSpaceSolver;
pub use session::{Session, SolveReport, StepReport};
pub use spectral::{LmSolver, PassReport, SpectralInput};
pub use state::{SolverState, SolverStatus};
pub use thermo::{ThermodynamicResult, derive_thermodynamics};
pub use transform::SineTransform;
