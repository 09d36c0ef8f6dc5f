//! Mutable per-state-point solver state.

use core::fmt;
use oz_core::{PotentialTables, Real};

/// Lifecycle of one solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverStatus {
    Initialized,
    Iterating,
    Converged,
    /// Iteration budget spent; the last iterate is still reported.
    MaxIterReached,
    /// Stopped on request; the last completed iterate is reported.
    Cancelled,
}

impl SolverStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SolverStatus::Converged | SolverStatus::MaxIterReached | SolverStatus::Cancelled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::Initialized => "initialized",
            SolverStatus::Iterating => "iterating",
            SolverStatus::Converged => "converged",
            SolverStatus::MaxIterReached => "max_iter_reached",
            SolverStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current estimates on the session grid.
///
/// `w` is the indirect correlation (`h_total = c + w`); `g_prev` is the
/// snapshot taken at the start of the last iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverState {
    pub g: Vec<Real>,
    pub h: Vec<Real>,
    pub c: Vec<Real>,
    pub w: Vec<Real>,
    pub g_prev: Vec<Real>,
    pub iteration: usize,
    /// Metric of the last completed iteration, `None` before the first one.
    pub dg: Option<Real>,
    pub status: SolverStatus,
}

impl SolverState {
    /// `g = 1`, `h = ExpU - 1` away from the origin; `g(0) = 0`, `h(0) = -1`.
    pub fn initial(tables: &PotentialTables) -> Self {
        let n = tables.len();
        let mut g = vec![1.0; n];
        let mut h: Vec<Real> = tables.exp_u().iter().map(|e| e - 1.0).collect();
        let mut c = vec![0.0; n];
        if n > 0 {
            g[0] = 0.0;
            h[0] = -1.0;
            c[0] = -1.0;
        }
        Self {
            g_prev: g.clone(),
            g,
            h,
            c,
            w: vec![0.0; n],
            iteration: 0,
            dg: None,
            status: SolverStatus::Initialized,
        }
    }

    pub fn len(&self) -> usize {
        self.g.len()
    }

    pub fn is_empty(&self) -> bool {
        self.g.is_empty()
    }

    /// Largest value of g(r).
    pub fn g_max(&self) -> Real {
        self.g.iter().cloned().fold(Real::NEG_INFINITY, Real::max)
    }

    /// `g(r) - 1`, the total correlation implied by g.
    pub fn total_correlation(&self) -> Vec<Real> {
        self.g.iter().map(|g| g - 1.0).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oz_core::{Grid, PotentialKind};

    #[test]
    fn initial_state_boundary_values() {
        let grid = Grid::new(50, 5.0).unwrap();
        let tables = PotentialTables::new(&grid, PotentialKind::HardSphere);
        let state = SolverState::initial(&tables);
        assert_eq!(state.g[0], 0.0);
        assert_eq!(state.h[0], -1.0);
        assert!(state.g[1..].iter().all(|&g| g == 1.0));
        assert_eq!(state.status, SolverStatus::Initialized);
        assert!(state.dg.is_none());
        assert!(!state.status.is_terminal());
    }
}
