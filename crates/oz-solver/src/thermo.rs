//! Thermodynamic properties of a terminal state.

use crate::config::StatePoint;
use crate::state::SolverState;
use oz_core::{ClosureKind, Grid, PotentialKind, PotentialTables, Real, TINY};
use std::f64::consts::PI;

/// Properties derived from one solved state point, in reduced units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermodynamicResult {
    /// Virial-route pressure.
    pub pressure: Real,
    /// Pressure from the third moment of h.
    pub pressure_moment: Real,
    /// Excess energy; zero for hard spheres.
    pub energy: Real,
    pub chemical_potential: Real,
    pub temperature: Real,
    pub density: Real,
}

/// Rectangular quadrature over the session grid. Reads `state.h` and
/// `state.w` only and never mutates anything.
pub fn derive_thermodynamics(
    grid: &Grid,
    tables: &PotentialTables,
    point: StatePoint,
    closure: ClosureKind,
    state: &SolverState,
) -> ThermodynamicResult {
    let rho = point.density;
    let temperature = point.temperature;
    let dr = grid.spacing();
    let r = grid.r();
    let lj = tables.kind() == PotentialKind::LennardJones;

    let mut h_r2 = 0.0;
    let mut h_r3 = 0.0;
    let mut energy_sum = 0.0;
    let mut c2_r2 = 0.0;
    for i in 0..grid.len().min(state.len()) {
        let ri = r[i];
        let h = state.h[i];
        let w = state.w[i];
        let r2 = ri * ri;
        h_r2 += h * r2 * dr;
        if i > 0 {
            h_r3 += ri * r2 * h * dr;
        }

        let u = if temperature > TINY { tables.f2()[i] } else { 0.0 };
        if lj {
            energy_sum += u * temperature * (h + 1.0) * r2 * dr;
        }

        let bridge = if closure == ClosureKind::MartynovSarkisovModified {
            let shift = if temperature > TINY { rho * u / temperature } else { 0.0 };
            let omega = w - shift;
            -omega * omega / 6.0
        } else {
            0.0
        };
        let c2 = h - w - 0.5 * h * (w + bridge);
        c2_r2 += c2 * r2 * dr;
    }

    ThermodynamicResult {
        pressure: rho * temperature * (1.0 + 2.0 * PI * rho * h_r2),
        pressure_moment: rho + 2.0 * PI * rho * rho / 3.0 * h_r3,
        energy: 2.0 * PI * rho * energy_sum,
        chemical_potential: temperature * (rho.ln() - 4.0 * PI * rho * c2_r2),
        temperature,
        density: rho,
    }
}
