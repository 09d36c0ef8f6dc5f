//! Damped real-space fixed-point iteration.

use crate::correlation::{PointwiseInput, update_h_into};
use crate::config::Damping;
use crate::state::SolverState;
use oz_core::{Real, relative_change};
use std::f64::consts::PI;

/// Scratch buffers for the real-space iteration, sized once per grid.
#[derive(Clone, Debug)]
pub struct RealSpaceSolver {
    h_new: Vec<Real>,
}

impl RealSpaceSolver {
    pub fn new(points: usize) -> Self {
        Self {
            h_new: vec![0.0; points],
        }
    }

    /// One iteration; returns the relative change of g.
    ///
    /// 1. snapshot `g_prev = g`
    /// 2. pointwise `h_new`, mixed into h with weight `damping.h`
    /// 3. cumulative integral `sum_{k<=i} h[k] r[k]^2 dr`
    /// 4. `g_new = h + 1 - 2 pi rho integral / r`, mixed into g with weight `damping.g`
    pub fn step(
        &mut self,
        input: &PointwiseInput<'_>,
        damping: Damping,
        state: &mut SolverState,
    ) -> Real {
        let n = state.len();
        debug_assert_eq!(n, input.grid.len());
        if self.h_new.len() != n {
            self.h_new.resize(n, 0.0);
        }

        state.g_prev.copy_from_slice(&state.g);
        update_h_into(&mut self.h_new, input);

        for (h, h_new) in state.h.iter_mut().zip(&self.h_new) {
            *h = damping.h * h_new + (1.0 - damping.h) * *h;
        }

        let r = input.grid.r();
        let dr = input.grid.spacing();
        let prefactor = 2.0 * PI * input.point.density;

        state.h[0] = -1.0;
        state.g[0] = 0.0;
        state.w[0] = 0.0;
        state.c[0] = -1.0;

        let mut integral = 0.0;
        for i in 1..n {
            integral += state.h[i] * r[i] * r[i] * dr;
            let correction = prefactor * integral / r[i];
            let g_new = state.h[i] + 1.0 - correction;
            state.g[i] = damping.g * g_new + (1.0 - damping.g) * state.g_prev[i];
            state.w[i] = -correction;
            state.c[i] = state.g[i] - 1.0 - state.w[i];
        }

        relative_change(&state.g, &state.g_prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatePoint;
    use oz_core::{ClosureKind, Grid, PotentialKind, PotentialTables};

    #[test]
    fn boundary_values_hold_every_iteration() {
        let grid = Grid::new(200, 8.0).unwrap();
        let tables = PotentialTables::new(&grid, PotentialKind::LennardJones);
        let input = PointwiseInput {
            grid: &grid,
            tables: &tables,
            point: StatePoint::new(1.5, 0.6),
            closure: ClosureKind::Hnc,
            alpha: 1.0,
            bridge: None,
        };
        let mut state = SolverState::initial(&tables);
        let mut solver = RealSpaceSolver::new(grid.len());
        for _ in 0..25 {
            let dg = solver.step(&input, Damping::default(), &mut state);
            assert!(dg.is_finite() && dg >= 0.0);
            assert_eq!(state.g[0], 0.0);
            assert_eq!(state.h[0], -1.0);
        }
    }

    #[test]
    fn metric_shrinks_geometrically() {
        let grid = Grid::new(500, 10.0).unwrap();
        let tables = PotentialTables::new(&grid, PotentialKind::HardSphere);
        let input = PointwiseInput {
            grid: &grid,
            tables: &tables,
            point: StatePoint::new(1.0, 0.5),
            closure: ClosureKind::PercusYevick,
            alpha: 1.0,
            bridge: None,
        };
        let mut state = SolverState::initial(&tables);
        let mut solver = RealSpaceSolver::new(grid.len());
        let first = solver.step(&input, Damping::default(), &mut state);
        let mut last = first;
        for _ in 0..20 {
            last = solver.step(&input, Damping::default(), &mut state);
        }
        assert!(last < first * 0.1, "first {first}, last {last}");
    }
}
