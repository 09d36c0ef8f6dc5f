//! Sine-transform (LM) solver.
//!
//! Works on the shifted grid `r_i = (i + 1) dR` and carries the indirect
//! correlation as `Gi0 = r gamma(r)`. One outer pass:
//!
//! 1. `c = (FM + 1) exp(omega(gamma)) - gamma - 1` pointwise
//! 2. `C_j = 4 pi dR * DST(r c)_j / 2`, i.e. `k_j c^(k_j)`
//! 3. Ornstein-Zernike in reciprocal space:
//!    `Gnt_j = rho C_j^2 / (t_j - rho C_j)` with `t_j = (j+1) pi / (N dR)`
//! 4. harmonics `j < Na` are refined by Newton on the linearised map, the rest
//!    take `Gnt` directly
//! 5. back to real space with `pi / (2 pi^2) / dR` times the normalised inverse
//!
//! The Jacobian of `C` with respect to the band is
//! `P[|j-l|] - P[j+l+2]`, with `P` the cosine moments of `dc/dgamma`.

use crate::closure::{ClosureArgs, omega, omega_derivative};
use crate::config::StatePoint;
use crate::correlation::EXP_CAP;
use crate::newton::{NewtonConfig, newton_solve};
use crate::state::SolverState;
use crate::transform::SineTransform;
use nalgebra::{DMatrix, DVector};
use oz_core::{ClosureKind, Grid, PotentialKind, Real, TINY, lennard_jones};
use std::f64::consts::PI;
use tracing::{debug, warn};

/// `FM` is pinned to -1 once `u / T` exceeds this.
const FM_EXPONENT_LIMIT: Real = 60.0;

/// Forward Hankel scale per unit spacing: `4 pi` over the DST-II factor of 2.
const FORWARD_SCALE: Real = 4.0 * PI / 2.0;

/// Inverse Hankel scale per unit reciprocal spacing `pi / dR`.
const INVERSE_SCALE: Real = PI / (2.0 * PI * PI);

/// Immutable snapshot handed to each outer pass.
#[derive(Clone, Copy, Debug)]
pub struct SpectralInput<'a> {
    pub grid: &'a Grid,
    pub potential: PotentialKind,
    pub point: StatePoint,
    pub closure: ClosureKind,
    pub alpha: Real,
    /// Bridge table on the session grid, only consulted for MHNC.
    pub bridge: Option<&'a [Real]>,
    /// Harmonics refined by Newton; 0 gives plain reciprocal-space iteration.
    pub harmonics: usize,
    pub newton: NewtonConfig,
    /// Weight of the new iterate when it replaces the carried one.
    pub mixing: Real,
}

impl SpectralInput<'_> {
    #[inline]
    fn bridge_at(&self, session_index: usize) -> Real {
        if self.closure.needs_bridge_table() {
            self.bridge
                .and_then(|b| b.get(session_index))
                .copied()
                .unwrap_or(0.0)
        } else {
            0.0
        }
    }
}

/// Outcome of one outer pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassReport {
    /// Relative change of the indirect correlation.
    pub dg: Real,
    pub newton_iterations: usize,
    pub newton_converged: bool,
    /// Newton failed and the band took a direct update.
    pub newton_fallback: bool,
}

/// Reciprocal-space state, allocated once per grid size.
#[derive(Clone, Debug)]
pub struct LmSolver {
    n: usize,
    spacing: Real,
    transform: SineTransform,
    r: Vec<Real>,
    fm: Vec<Real>,
    /// Pair potential over temperature, fed to the closure.
    f2: Vec<Real>,
    fm_key: Option<(PotentialKind, u64)>,
    /// `Gi0`, the state being relaxed; survives between state points.
    gamma_r: Vec<Real>,
    new_gamma_r: Vec<Real>,
    omega: Vec<Real>,
    /// `dc/dgamma` per point.
    slope: Vec<Real>,
    c_r: Vec<Real>,
    c_k: Vec<Real>,
    gamma_k: Vec<Real>,
    gnt: Vec<Real>,
    /// Newton correction of the low band.
    dgt: Vec<Real>,
    /// Cosine moments `P`, length `2 Na + 1`.
    moments: Vec<Real>,
    /// Diagonal `P[0] - P[2j+2]` of the band Jacobian.
    band_diag: Vec<Real>,
    /// Band residual after the last Newton solve.
    residual: Vec<Real>,
}

impl LmSolver {
    pub fn new(grid: &Grid) -> Self {
        let n = grid.len();
        let spacing = grid.spacing();
        Self {
            n,
            spacing,
            transform: SineTransform::new(n),
            r: (1..=n).map(|i| i as Real * spacing).collect(),
            fm: vec![0.0; n],
            f2: vec![0.0; n],
            fm_key: None,
            gamma_r: vec![0.0; n],
            new_gamma_r: vec![0.0; n],
            omega: vec![0.0; n],
            slope: vec![0.0; n],
            c_r: vec![0.0; n],
            c_k: vec![0.0; n],
            gamma_k: vec![0.0; n],
            gnt: vec![0.0; n],
            dgt: Vec::new(),
            moments: Vec::new(),
            band_diag: Vec::new(),
            residual: Vec::new(),
        }
    }

    /// Forget the carried indirect correlation.
    pub fn reset(&mut self) {
        self.gamma_r.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Carried `r gamma(r)` on the shifted grid.
    pub fn indirect(&self) -> &[Real] {
        &self.gamma_r
    }

    /// Band residual of the last Newton solve.
    pub fn band_residual(&self) -> &[Real] {
        &self.residual
    }

    /// Diagonal of the last band Jacobian (before the OZ slope).
    pub fn band_diagonal(&self) -> &[Real] {
        &self.band_diag
    }

    fn recount_fm(&mut self, potential: PotentialKind, temperature: Real) {
        let key = (potential, temperature.to_bits());
        if self.fm_key == Some(key) {
            return;
        }
        for i in 0..self.n {
            let r = self.r[i];
            let (fm, f2) = match potential {
                PotentialKind::LennardJones => {
                    let fi = if temperature > TINY {
                        lennard_jones(r) / temperature
                    } else {
                        0.0
                    };
                    if fi >= FM_EXPONENT_LIMIT {
                        (-1.0, fi)
                    } else {
                        ((-fi).min(EXP_CAP).exp() - 1.0, fi)
                    }
                }
                PotentialKind::HardSphere => (if r < 1.0 { -1.0 } else { 0.0 }, 0.0),
            };
            self.fm[i] = fm;
            self.f2[i] = f2;
        }
        self.fm_key = Some(key);
    }

    /// Reciprocal coordinate `t_j = (j+1) pi / (N dR)`.
    #[inline]
    fn t(&self, j: usize) -> Real {
        (j + 1) as Real * PI / (self.n as Real * self.spacing)
    }

    /// One outer iteration; updates the carried `Gi0`.
    pub fn pass(&mut self, input: &SpectralInput<'_>) -> PassReport {
        let n = self.n;
        let rho = input.point.density;
        let temperature = input.point.temperature;
        self.recount_fm(input.potential, temperature);

        for i in 0..n {
            let r = self.r[i];
            let gamma = self.gamma_r[i] / r;
            let args = ClosureArgs {
                density: rho,
                f2: self.f2[i],
                temperature,
                r,
                alpha: input.alpha,
            };
            let w = omega(input.closure, gamma, args) + input.bridge_at(i + 1);
            let boltz = (self.fm[i] + 1.0) * w.min(EXP_CAP).exp();
            self.omega[i] = w;
            self.c_r[i] = (boltz - gamma - 1.0) * r;
            self.slope[i] = boltz * omega_derivative(input.closure, gamma, args) - 1.0;
        }

        let forward = FORWARD_SCALE * self.spacing;
        self.transform.forward_into(&self.c_r, &mut self.c_k);
        self.transform.forward_into(&self.gamma_r, &mut self.gamma_k);
        self.c_k.iter_mut().for_each(|v| *v *= forward);
        self.gamma_k.iter_mut().for_each(|v| *v *= forward);

        for j in 0..n {
            self.gnt[j] = oz_kernel(rho, self.c_k[j], self.t(j)).0;
        }

        let band = input.harmonics.min(n.saturating_sub(1));
        let mut report = PassReport {
            dg: 0.0,
            newton_iterations: 0,
            newton_converged: true,
            newton_fallback: false,
        };
        if band > 0 {
            self.refine_band(band, input, &mut report);
        }

        for j in 0..n {
            self.gamma_k[j] = if j < band {
                self.gamma_k[j] + self.dgt[j]
            } else {
                self.gnt[j]
            };
        }

        let inverse = INVERSE_SCALE / self.spacing;
        self.transform
            .inverse_into(&self.gamma_k, &mut self.new_gamma_r);
        let mix = input.mixing;
        let mut max_diff: Real = 0.0;
        let mut sum_abs = 0.0;
        for i in 0..n {
            let fresh = inverse * self.new_gamma_r[i];
            let updated = mix * fresh + (1.0 - mix) * self.gamma_r[i];
            let r = self.r[i];
            max_diff = max_diff.max((updated - self.gamma_r[i]).abs() / r);
            sum_abs += (updated / r).abs();
            self.new_gamma_r[i] = updated;
        }
        std::mem::swap(&mut self.gamma_r, &mut self.new_gamma_r);

        report.dg = max_diff / (sum_abs / n as Real + TINY);
        debug!(
            dg = report.dg,
            newton_iterations = report.newton_iterations,
            "spectral pass"
        );
        report
    }

    fn refine_band(&mut self, band: usize, input: &SpectralInput<'_>, report: &mut PassReport) {
        let rho = input.point.density;
        self.moments.resize(2 * band + 1, 0.0);
        self.band_diag.resize(band, 0.0);
        self.residual.resize(band, 0.0);
        self.dgt.resize(band, 0.0);

        self.transform
            .cosine_moments_into(&self.slope, &mut self.moments);
        for j in 0..band {
            self.band_diag[j] = self.moments[0] - self.moments[2 * j + 2];
        }

        let moments = &self.moments;
        let coupling =
            DMatrix::from_fn(band, band, |j, l| moments[j.abs_diff(l)] - moments[j + l + 2]);
        let c_band = DVector::from_iterator(band, self.c_k[..band].iter().copied());
        let base = DVector::from_iterator(band, self.gamma_k[..band].iter().copied());
        let t = DVector::from_fn(band, |j, _| self.t(j));

        let residual_fn = |x: &DVector<Real>| {
            let c_lin = &c_band + &coupling * x;
            DVector::from_fn(band, |j, _| oz_kernel(rho, c_lin[j], t[j]).0 - base[j] - x[j])
        };
        let jacobian_fn = |x: &DVector<Real>| {
            let c_lin = &c_band + &coupling * x;
            let mut jac = coupling.clone();
            for j in 0..band {
                let slope = oz_kernel(rho, c_lin[j], t[j]).1;
                jac.row_mut(j).scale_mut(slope);
                jac[(j, j)] -= 1.0;
            }
            jac
        };

        match newton_solve(
            DVector::zeros(band),
            &base,
            &residual_fn,
            &jacobian_fn,
            &input.newton,
        ) {
            Ok(result) => {
                report.newton_iterations = result.iterations;
                report.newton_converged = result.converged;
                let final_residual = residual_fn(&result.x);
                self.dgt.copy_from_slice(result.x.as_slice());
                self.residual.copy_from_slice(final_residual.as_slice());
            }
            Err(err) => {
                warn!(error = %err, "band Newton failed, using direct update");
                report.newton_converged = false;
                report.newton_fallback = true;
                for j in 0..band {
                    self.dgt[j] = self.gnt[j] - self.gamma_k[j];
                    self.residual[j] = 0.0;
                }
            }
        }
    }

    /// Write g, h, c and w for the carried `Gi0` onto the session grid.
    ///
    /// Shifted point `i` lands on session index `i + 1`; the last shifted
    /// point lies at `r = L` and is dropped.
    pub fn write_state(&self, input: &SpectralInput<'_>, state: &mut SolverState) {
        let len = state.len();
        if len == 0 {
            return;
        }
        state.g[0] = 0.0;
        state.h[0] = -1.0;
        state.c[0] = -1.0;
        state.w[0] = 0.0;

        for i in 0..self.n.min(len - 1) {
            let s = i + 1;
            let r = self.r[i];
            let gamma = self.gamma_r[i] / r;
            let args = ClosureArgs {
                density: input.point.density,
                f2: self.f2[i],
                temperature: input.point.temperature,
                r,
                alpha: input.alpha,
            };
            let w = omega(input.closure, gamma, args) + input.bridge_at(s);
            let g = (self.fm[i] + 1.0) * w.min(EXP_CAP).exp();
            state.g[s] = g;
            state.h[s] = g - 1.0;
            state.w[s] = gamma;
            state.c[s] = g - 1.0 - gamma;
        }
    }
}

/// Reciprocal OZ relation `rho C^2 / (t - rho C)` and its derivative in `C`.
#[inline]
fn oz_kernel(rho: Real, c: Real, t: Real) -> (Real, Real) {
    let mut den = t - rho * c;
    if den.abs() < TINY {
        den = if den < 0.0 { -TINY } else { TINY };
    }
    let value = rho * c * c / den;
    let slope = rho * c * (2.0 * t - rho * c) / (den * den);
    (value, slope)
}
