//! Pointwise total-correlation update.
//!
//! Produces the zeroth approximation `h[i] = ExpU[i] exp(omega_i) - 1` with the
//! closure evaluated at the trial value `g = 0`. No point reads a neighbour, so
//! large grids are filled in parallel.

use crate::closure::{ClosureArgs, omega};
use crate::config::StatePoint;
use oz_core::{ClosureKind, Grid, PotentialTables, Real, TINY, lennard_jones};
use rayon::prelude::*;

/// Largest exponent passed to `exp` before clamping.
pub const EXP_CAP: Real = 700.0;

/// Grids at least this large are filled with rayon.
const PARALLEL_THRESHOLD: usize = 8192;

/// Everything the pointwise update reads, borrowed from the session.
#[derive(Clone, Copy, Debug)]
pub struct PointwiseInput<'a> {
    pub grid: &'a Grid,
    pub tables: &'a PotentialTables,
    pub point: StatePoint,
    pub closure: ClosureKind,
    pub alpha: Real,
    /// Tabulated bridge function, only consulted for MHNC.
    pub bridge: Option<&'a [Real]>,
}

impl PointwiseInput<'_> {
    #[inline]
    fn value_at(&self, i: usize) -> Real {
        let r = self.grid.r()[i];
        if r <= 0.0 {
            return -1.0;
        }
        let exp_u = self.tables.exp_u()[i];
        if exp_u == 0.0 {
            return -1.0;
        }

        // Lennard-Jones form for every potential; it only reaches MS_MOD.
        let temperature = self.point.temperature;
        let f2 = if temperature > TINY { lennard_jones(r) } else { 0.0 };
        let args = ClosureArgs {
            density: self.point.density,
            f2: f2 / temperature.max(TINY),
            temperature,
            r,
            alpha: self.alpha,
        };

        let mut w = omega(self.closure, 0.0, args);
        if self.closure.needs_bridge_table() {
            w += self.bridge.and_then(|b| b.get(i)).copied().unwrap_or(0.0);
        }
        exp_u * w.min(EXP_CAP).exp() - 1.0
    }
}

/// Fill `out` with the pointwise estimate of h(r).
///
/// `out` must have one slot per grid point.
pub fn update_h_into(out: &mut [Real], input: &PointwiseInput<'_>) {
    debug_assert_eq!(out.len(), input.grid.len());
    if out.len() >= PARALLEL_THRESHOLD {
        out.par_iter_mut()
            .enumerate()
            .for_each(|(i, h)| *h = input.value_at(i));
    } else {
        for (i, h) in out.iter_mut().enumerate() {
            *h = input.value_at(i);
        }
    }
}

/// Allocating convenience wrapper around [`update_h_into`].
pub fn update_h(input: &PointwiseInput<'_>) -> Vec<Real> {
    let mut out = vec![0.0; input.grid.len()];
    update_h_into(&mut out, input);
    out
}
