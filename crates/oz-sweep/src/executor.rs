//! Sweep execution.

use crate::error::{SweepError, SweepResult};
use crate::plan::{SweepPlan, solve_config};
use crate::progress::SweepProgress;
use oz_project::{RunConfig, load_bridge_table};
use oz_solver::{
    CancelToken, Session, SolveConfig, SolverStatus, StatePoint, ThermodynamicResult,
};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use tracing::{info, warn};

/// Summary of one solved state point.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPointResult {
    /// Position in sweep order.
    pub index: usize,
    pub point: StatePoint,
    pub status: SolverStatus,
    pub iterations: usize,
    pub dg: Option<f64>,
    pub thermo: ThermodynamicResult,
    pub r: Vec<f64>,
    pub g: Vec<f64>,
    /// `g - 1`
    pub h: Vec<f64>,
    pub g_max: f64,
    pub h_max: f64,
    /// MHNC ran with the zero bridge table.
    pub bridge_fallback: bool,
}

impl SweepPointResult {
    pub fn converged(&self) -> bool {
        self.status == SolverStatus::Converged
    }
}

/// All points of a finished (or cancelled) sweep, in sweep order.
#[derive(Debug, Clone, Default)]
pub struct SweepOutcome {
    pub points: Vec<SweepPointResult>,
    pub total: usize,
    pub cancelled: bool,
}

impl SweepOutcome {
    pub fn num_converged(&self) -> usize {
        self.points.iter().filter(|p| p.converged()).count()
    }

    pub fn num_not_converged(&self) -> usize {
        self.points.len() - self.num_converged()
    }
}

/// Solve one point on an existing session.
pub fn solve_point(
    session: &mut Session,
    config: &RunConfig,
    solve: SolveConfig,
    index: usize,
    point: StatePoint,
    cancel: Option<&CancelToken>,
) -> SweepResult<SweepPointResult> {
    let solver_err = |source| SweepError::Solver {
        point_index: index,
        source,
    };

    let mut bridge_fallback = false;
    if config.closure.needs_bridge_table() {
        let table = load_bridge_table(&config.bridge_dir, point.density);
        bridge_fallback = table.is_fallback();
        session.set_bridge_table(Some(table.into_values()));
    } else {
        session.set_bridge_table(None);
    }

    session.set_state(point, solve).map_err(solver_err)?;
    let report = session.run_to_convergence(cancel).map_err(solver_err)?;
    let thermo = session.derive_thermodynamics().map_err(solver_err)?;

    let state = session.state();
    let h = state.total_correlation();
    let h_max = h.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let result = SweepPointResult {
        index,
        point,
        status: report.status,
        iterations: report.iterations,
        dg: report.dg,
        thermo,
        r: session.grid().r().to_vec(),
        g: state.g.clone(),
        h,
        g_max: state.g_max(),
        h_max,
        bridge_fallback,
    };

    match result.status {
        SolverStatus::Converged => info!(
            index,
            temperature = point.temperature,
            density = point.density,
            iterations = result.iterations,
            pressure = thermo.pressure,
            "sweep point converged"
        ),
        SolverStatus::Cancelled => info!(index, "sweep point cancelled"),
        _ => warn!(
            index,
            temperature = point.temperature,
            density = point.density,
            status = result.status.as_str(),
            "sweep point did not converge"
        ),
    }
    Ok(result)
}

fn new_session(config: &RunConfig) -> SweepResult<Session> {
    Session::initialize(config.grid.points, config.grid.length, config.potential).map_err(
        |source| SweepError::Solver {
            point_index: 0,
            source,
        },
    )
}

fn checked_solve_config(config: &RunConfig) -> SweepResult<SolveConfig> {
    let solve = solve_config(config);
    solve
        .validate(config.grid.points)
        .map_err(|e| SweepError::InvalidConfiguration(e.to_string()))?;
    Ok(solve)
}

/// Lazy, in-order sweep on one session.
///
/// Yields one result per point and ends after the last density of the last
/// temperature, on cancellation, or after the first error. The spectral
/// solver's state carries over between densities of the same temperature.
pub struct SweepIter<'a> {
    config: &'a RunConfig,
    plan: SweepPlan,
    solve: SolveConfig,
    session: Session,
    cursor: usize,
    cancel: Option<CancelToken>,
    halted: bool,
}

impl<'a> SweepIter<'a> {
    pub fn new(config: &'a RunConfig, cancel: Option<CancelToken>) -> SweepResult<Self> {
        let plan = SweepPlan::from_config(config)?;
        let solve = checked_solve_config(config)?;
        let session = new_session(config)?;
        Ok(Self {
            config,
            plan,
            solve,
            session,
            cursor: 0,
            cancel,
            halted: false,
        })
    }

    /// Rewind to the first point with a fresh spectral state.
    pub fn restart(&mut self) {
        self.cursor = 0;
        self.halted = false;
        self.session.reset_spectral();
    }

    pub fn plan(&self) -> &SweepPlan {
        &self.plan
    }

    pub fn remaining(&self) -> usize {
        if self.halted {
            0
        } else {
            self.plan.len() - self.cursor
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

impl Iterator for SweepIter<'_> {
    type Item = SweepResult<SweepPointResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted || self.is_cancelled() {
            return None;
        }
        let index = self.cursor;
        let point = self.plan.point(index)?;
        if self.plan.starts_row(index) {
            self.session.reset_spectral();
        }

        let result = solve_point(
            &mut self.session,
            self.config,
            self.solve,
            index,
            point,
            self.cancel.as_ref(),
        );
        self.cursor += 1;
        match &result {
            Ok(p) if p.status == SolverStatus::Cancelled => self.halted = true,
            Err(_) => self.halted = true,
            Ok(_) => {}
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}

/// Solve every point in order, reporting after each one.
pub fn execute_sweep(
    config: &RunConfig,
    cancel: Option<&CancelToken>,
    mut progress_cb: Option<&mut dyn FnMut(SweepProgress)>,
) -> SweepResult<SweepOutcome> {
    let iter = SweepIter::new(config, cancel.cloned())?;
    let total = iter.plan().len();
    let mut points = Vec::with_capacity(total);

    for result in iter {
        let point = result?;
        if let Some(cb) = progress_cb.as_deref_mut() {
            cb(SweepProgress {
                index: point.index,
                completed: points.len() + 1,
                total,
                point: point.point,
                status: point.status,
                iterations: point.iterations,
            });
        }
        points.push(point);
    }

    let cancelled = cancel.is_some_and(CancelToken::is_cancelled);
    Ok(SweepOutcome {
        points,
        total,
        cancelled,
    })
}

/// Solve every point independently on the rayon pool.
///
/// Each point gets its own session, so no reciprocal state is carried over.
/// Progress events arrive in completion order.
pub fn execute_sweep_parallel(
    config: &RunConfig,
    cancel: Option<&CancelToken>,
    progress: Option<Sender<SweepProgress>>,
) -> SweepResult<SweepOutcome> {
    let plan = SweepPlan::from_config(config)?;
    let solve = checked_solve_config(config)?;
    let total = plan.len();
    let completed = AtomicUsize::new(0);

    let results = (0..total)
        .into_par_iter()
        .map_with(progress, |tx, index| {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Ok(None);
            }
            let Some(point) = plan.point(index) else {
                return Ok(None);
            };
            let mut session = new_session(config)?;
            let result = solve_point(&mut session, config, solve, index, point, cancel)?;
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(tx) = tx {
                let _ = tx.send(SweepProgress {
                    index,
                    completed: done,
                    total,
                    point,
                    status: result.status,
                    iterations: result.iterations,
                });
            }
            Ok(Some(result))
        })
        .collect::<SweepResult<Vec<Option<SweepPointResult>>>>()?;

    let points: Vec<_> = results.into_iter().flatten().collect();
    let cancelled = cancel.is_some_and(CancelToken::is_cancelled);
    Ok(SweepOutcome {
        points,
        total,
        cancelled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oz_core::PotentialKind;
    use oz_project::{GridDef, RangeDef};

    fn small_config() -> RunConfig {
        RunConfig {
            grid: GridDef {
                points: 200,
                length: 8.0,
            },
            potential: PotentialKind::HardSphere,
            temperature: RangeDef::single(1.0),
            density: RangeDef {
                start: 0.1,
                end: 0.3,
                step: 0.1,
            },
            ..RunConfig::default()
        }
    }

    #[test]
    fn iterator_ends_after_last_point() {
        let cfg = small_config();
        let mut iter = SweepIter::new(&cfg, None).unwrap();
        assert_eq!(iter.remaining(), 3);
        let results: Vec<_> = iter.by_ref().map(|r| r.unwrap()).collect();
        assert_eq!(results.len(), 3);
        assert!(iter.next().is_none());
        let last = results.last().unwrap();
        assert!((last.point.density - 0.3).abs() < 1e-12);
        for (i, p) in results.iter().enumerate() {
            assert_eq!(p.index, i);
            assert_eq!(p.h.len(), p.g.len());
            assert!((p.h_max - (p.g_max - 1.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn restart_replays_the_sweep() {
        let cfg = small_config();
        let mut iter = SweepIter::new(&cfg, None).unwrap();
        let first: Vec<_> = iter.by_ref().map(|r| r.unwrap()).collect();
        iter.restart();
        let second: Vec<_> = iter.map(|r| r.unwrap()).collect();
        assert_eq!(first, second);
    }
}
