//! Solve session: one grid, one potential, a sequence of state points.
//!
//! The session owns the grid, the potential tables, the per-point
//! [`SolverState`] and the scratch of both solvers. The spectral solver only
//! ever sees an immutable [`SpectralInput`] and writes its result back through
//! [`LmSolver::write_state`].

use crate::cancel::CancelToken;
use crate::config::{SolveConfig, StatePoint};
use crate::correlation::PointwiseInput;
use crate::error::{SolverError, SolverResult};
use crate::newton::NewtonConfig;
use crate::real_space::RealSpaceSolver;
use crate::spectral::{LmSolver, SpectralInput};
use crate::state::{SolverState, SolverStatus};
use crate::thermo::{self, ThermodynamicResult};
use oz_core::{Grid, PotentialKind, PotentialTables, Real, SolutionMethod};
use tracing::{debug, info, warn};

/// Result of a single [`Session::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    pub iteration: usize,
    pub dg: Real,
    pub status: SolverStatus,
}

/// Result of [`Session::run_to_convergence`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveReport {
    pub status: SolverStatus,
    pub iterations: usize,
    /// `None` if no iteration ran.
    pub dg: Option<Real>,
}

impl SolveReport {
    pub fn converged(&self) -> bool {
        self.status == SolverStatus::Converged
    }
}

#[derive(Clone, Copy, Debug)]
struct Active {
    point: StatePoint,
    config: SolveConfig,
}

#[derive(Clone, Debug)]
pub struct Session {
    grid: Grid,
    tables: PotentialTables,
    real_space: RealSpaceSolver,
    /// Built on the first spectral step.
    spectral: Option<LmSolver>,
    bridge: Option<Vec<Real>>,
    active: Option<Active>,
    state: SolverState,
}

impl Session {
    /// Build the grid and potential tables.
    pub fn initialize(
        grid_size: usize,
        domain_length: Real,
        potential: PotentialKind,
    ) -> SolverResult<Self> {
        let grid = Grid::new(grid_size, domain_length)?;
        let tables = PotentialTables::new(&grid, potential);
        let state = SolverState::initial(&tables);
        Ok(Self {
            real_space: RealSpaceSolver::new(grid.len()),
            spectral: None,
            grid,
            tables,
            bridge: None,
            active: None,
            state,
        })
    }

    /// Configure the next solve and reset the per-point state.
    ///
    /// The spectral solver's indirect correlation is kept, so consecutive
    /// points of a sweep start from the previous solution.
    pub fn set_state(&mut self, point: StatePoint, config: SolveConfig) -> SolverResult<()> {
        point.validate()?;
        config.validate(self.grid.len())?;
        self.state = SolverState::initial(&self.tables);
        self.active = Some(Active { point, config });
        debug!(
            temperature = point.temperature,
            density = point.density,
            closure = %config.closure,
            method = config.method.as_str(),
            "state point configured"
        );
        Ok(())
    }

    /// Bridge function for MHNC, indexed like the grid.
    pub fn set_bridge_table(&mut self, table: Option<Vec<Real>>) {
        self.bridge = table;
    }

    /// Drop the carried spectral state.
    pub fn reset_spectral(&mut self) {
        if let Some(spectral) = self.spectral.as_mut() {
            spectral.reset();
        }
    }

    /// One real-space iteration or one spectral outer pass.
    pub fn step(&mut self) -> SolverResult<StepReport> {
        let Active { point, config } = self.active.ok_or_else(|| SolverError::ProblemSetup {
            what: "step called before set_state".into(),
        })?;
        let bridge = self.bridge.as_deref();

        let dg = match config.method {
            SolutionMethod::RealSpace => {
                let input = PointwiseInput {
                    grid: &self.grid,
                    tables: &self.tables,
                    point,
                    closure: config.closure,
                    alpha: config.alpha,
                    bridge,
                };
                self.real_space.step(&input, config.damping, &mut self.state)
            }
            SolutionMethod::Fourier | SolutionMethod::Lm => {
                let mixing = if config.method == SolutionMethod::Fourier {
                    config.damping.g
                } else {
                    1.0
                };
                let input = SpectralInput {
                    grid: &self.grid,
                    potential: self.tables.kind(),
                    point,
                    closure: config.closure,
                    alpha: config.alpha,
                    bridge,
                    harmonics: config.newton_band(),
                    newton: NewtonConfig {
                        max_iterations: config.spectral.max_newton_iterations,
                        tolerance: config.convergence_dg,
                        ..NewtonConfig::default()
                    },
                    mixing,
                };
                let spectral = self
                    .spectral
                    .get_or_insert_with(|| LmSolver::new(&self.grid));
                let report = spectral.pass(&input);
                self.state.g_prev.copy_from_slice(&self.state.g);
                spectral.write_state(&input, &mut self.state);
                report.dg
            }
        };

        let state = &mut self.state;
        state.iteration += 1;
        state.dg = Some(dg);
        state.status = if dg < config.threshold() {
            SolverStatus::Converged
        } else if state.iteration >= config.iteration_limit() {
            SolverStatus::MaxIterReached
        } else {
            SolverStatus::Iterating
        };
        debug!(iteration = state.iteration, dg, "iteration");

        Ok(StepReport {
            iteration: state.iteration,
            dg,
            status: state.status,
        })
    }

    /// Step until converged, out of budget or cancelled.
    pub fn run_to_convergence(&mut self, cancel: Option<&CancelToken>) -> SolverResult<SolveReport> {
        if self.active.is_none() {
            return Err(SolverError::ProblemSetup {
                what: "run_to_convergence called before set_state".into(),
            });
        }
        while !self.state.status.is_terminal() {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                self.state.status = SolverStatus::Cancelled;
                break;
            }
            self.step()?;
        }

        let report = SolveReport {
            status: self.state.status,
            iterations: self.state.iteration,
            dg: self.state.dg,
        };
        match report.status {
            SolverStatus::Converged => info!(iterations = report.iterations, "converged"),
            SolverStatus::MaxIterReached => warn!(
                iterations = report.iterations,
                dg = report.dg.unwrap_or(Real::NAN),
                "iteration limit reached"
            ),
            _ => debug!(status = report.status.as_str(), "solve stopped"),
        }
        Ok(report)
    }

    pub fn derive_thermodynamics(&self) -> SolverResult<ThermodynamicResult> {
        let active = self.active.ok_or_else(|| SolverError::ProblemSetup {
            what: "no state point configured".into(),
        })?;
        Ok(thermo::derive_thermodynamics(
            &self.grid,
            &self.tables,
            active.point,
            active.config.closure,
            &self.state,
        ))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tables(&self) -> &PotentialTables {
        &self.tables
    }

    pub fn state(&self) -> &SolverState {
        &self.state
    }

    pub fn point(&self) -> Option<StatePoint> {
        self.active.map(|a| a.point)
    }

    pub fn config(&self) -> Option<&SolveConfig> {
        self.active.as_ref().map(|a| &a.config)
    }

    /// `None` until a spectral method has stepped.
    pub fn spectral(&self) -> Option<&LmSolver> {
        self.spectral.as_ref()
    }
}
