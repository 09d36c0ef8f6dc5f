//! Solve configuration and validation.
//!
//! Every check here runs before the first iteration; an invalid configuration
//! is the only condition that aborts a state point.

use crate::error::{SolverError, SolverResult};
use oz_core::{ClosureKind, Real, SolutionMethod};

/// One (temperature, density) point of a sweep, in reduced units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatePoint {
    pub temperature: Real,
    pub density: Real,
}

impl StatePoint {
    pub fn new(temperature: Real, density: Real) -> Self {
        Self {
            temperature,
            density,
        }
    }

    /// Temperature may be zero (degenerate but solvable); density must be positive.
    pub fn validate(&self) -> SolverResult<()> {
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(SolverError::config(format!(
                "temperature must be finite and non-negative, got {}",
                self.temperature
            )));
        }
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(SolverError::config(format!(
                "density must be finite and positive, got {}",
                self.density
            )));
        }
        Ok(())
    }
}

/// Linear mixing factors for the real-space iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Damping {
    /// Weight of the fresh h estimate.
    pub h: Real,
    /// Weight of the fresh g estimate.
    pub g: Real,
}

impl Default for Damping {
    fn default() -> Self {
        Self { h: 0.3, g: 0.2 }
    }
}

/// Settings for the sine-transform solvers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpectralConfig {
    /// Number of low harmonics refined by Newton (`Na`).
    pub harmonics: usize,
    pub max_outer_iterations: usize,
    pub max_newton_iterations: usize,
    /// Convergence threshold of the outer loop.
    pub outer_threshold: Real,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            harmonics: 48,
            max_outer_iterations: 300,
            max_newton_iterations: 100,
            outer_threshold: 1e-5,
        }
    }
}

/// Configuration of one solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveConfig {
    pub closure: ClosureKind,
    pub method: SolutionMethod,
    /// Relative change below which an iteration counts as converged.
    pub convergence_dg: Real,
    /// Iteration budget of the real-space solver.
    pub max_iterations: usize,
    /// Rogers-Young mixing parameter.
    pub alpha: Real,
    pub damping: Damping,
    pub spectral: SpectralConfig,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            closure: ClosureKind::PercusYevick,
            method: SolutionMethod::RealSpace,
            convergence_dg: 1e-5,
            max_iterations: 1000,
            alpha: 1.0,
            damping: Damping::default(),
            spectral: SpectralConfig::default(),
        }
    }
}

impl SolveConfig {
    /// Iteration budget for the configured method.
    pub fn iteration_limit(&self) -> usize {
        if self.method.is_spectral() {
            self.spectral.max_outer_iterations
        } else {
            self.max_iterations
        }
    }

    /// Convergence threshold for the configured method.
    pub fn threshold(&self) -> Real {
        if self.method.is_spectral() {
            self.spectral.outer_threshold
        } else {
            self.convergence_dg
        }
    }

    /// Harmonics refined by Newton; the plain Fourier method refines none.
    pub fn newton_band(&self) -> usize {
        match self.method {
            SolutionMethod::Lm => self.spectral.harmonics,
            _ => 0,
        }
    }

    pub fn validate(&self, grid_points: usize) -> SolverResult<()> {
        check_threshold("convergence threshold", self.convergence_dg)?;
        if self.max_iterations == 0 {
            return Err(SolverError::config("max_iterations must be at least 1"));
        }
        if !(self.alpha > 0.0 && self.alpha <= 2.0) {
            return Err(SolverError::config(format!(
                "alpha must lie in (0, 2], got {}",
                self.alpha
            )));
        }
        check_fraction("h damping", self.damping.h)?;
        check_fraction("g damping", self.damping.g)?;

        if self.method.is_spectral() {
            let spectral = &self.spectral;
            check_threshold("outer threshold", spectral.outer_threshold)?;
            if spectral.max_outer_iterations == 0 {
                return Err(SolverError::config(
                    "max_outer_iterations must be at least 1",
                ));
            }
            if self.method == SolutionMethod::Lm {
                if spectral.harmonics == 0 || spectral.harmonics >= grid_points {
                    return Err(SolverError::config(format!(
                        "harmonics must lie in [1, {}), got {}",
                        grid_points, spectral.harmonics
                    )));
                }
                if spectral.max_newton_iterations == 0 {
                    return Err(SolverError::config(
                        "max_newton_iterations must be at least 1",
                    ));
                }
            }
        }
        Ok(())
    }
}

fn check_threshold(what: &str, value: Real) -> SolverResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SolverError::config(format!(
            "{what} must be positive, got {value}"
        )))
    }
}

fn check_fraction(what: &str, value: Real) -> SolverResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SolverError::config(format!(
            "{what} must lie in (0, 1], got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SolveConfig::default().validate(500).is_ok());
        let lm = SolveConfig {
            method: SolutionMethod::Lm,
            ..SolveConfig::default()
        };
        assert!(lm.validate(500).is_ok());
        assert_eq!(lm.newton_band(), 48);
        assert_eq!(lm.iteration_limit(), 300);
    }

    #[test]
    fn rejects_bad_values() {
        let base = SolveConfig::default();
        let cases = [
            SolveConfig { convergence_dg: 0.0, ..base },
            SolveConfig { max_iterations: 0, ..base },
            SolveConfig { alpha: 0.0, ..base },
            SolveConfig { alpha: 2.5, ..base },
            SolveConfig { damping: Damping { h: 0.0, g: 0.2 }, ..base },
            SolveConfig { damping: Damping { h: 0.3, g: 1.5 }, ..base },
        ];
        for case in cases {
            assert!(case.validate(500).is_err(), "{case:?}");
        }
    }

    #[test]
    fn rejects_band_wider_than_grid() {
        let cfg = SolveConfig {
            method: SolutionMethod::Lm,
            spectral: SpectralConfig {
                harmonics: 64,
                ..SpectralConfig::default()
            },
            ..SolveConfig::default()
        };
        assert!(cfg.validate(64).is_err());
        assert!(cfg.validate(65).is_ok());
    }

    #[test]
    fn state_point_validation() {
        assert!(StatePoint::new(0.0, 0.5).validate().is_ok());
        assert!(StatePoint::new(1.0, 0.0).validate().is_err());
        assert!(StatePoint::new(-1.0, 0.5).validate().is_err());
        assert!(StatePoint::new(f64::NAN, 0.5).validate().is_err());
    }
}
