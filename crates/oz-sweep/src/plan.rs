//! Sweep point generation.

use crate::error::{SweepError, SweepResult};
use oz_project::{RunConfig, validate_config};
use oz_solver::{Damping, SolveConfig, SpectralConfig, StatePoint};

/// Ordered list of state points: temperature outer, density inner.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPlan {
    temperatures: Vec<f64>,
    densities: Vec<f64>,
}

impl SweepPlan {
    pub fn from_config(config: &RunConfig) -> SweepResult<Self> {
        validate_config(config).map_err(|e| SweepError::InvalidConfiguration(e.to_string()))?;
        Ok(Self::new(config.temperature.values(), config.density.values()))
    }

    pub fn new(temperatures: Vec<f64>, densities: Vec<f64>) -> Self {
        Self {
            temperatures,
            densities,
        }
    }

    pub fn len(&self) -> usize {
        self.temperatures.len() * self.densities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point `index` in sweep order, `None` past the end.
    pub fn point(&self, index: usize) -> Option<StatePoint> {
        let per_temperature = self.densities.len();
        if per_temperature == 0 || index >= self.len() {
            return None;
        }
        let t = self.temperatures[index / per_temperature];
        let rho = self.densities[index % per_temperature];
        Some(StatePoint::new(t, rho))
    }

    /// Whether `index` opens a new temperature row.
    pub fn starts_row(&self, index: usize) -> bool {
        !self.densities.is_empty() && index % self.densities.len() == 0
    }

    pub fn points(&self) -> impl Iterator<Item = StatePoint> + '_ {
        (0..self.len()).filter_map(|i| self.point(i))
    }
}

/// Solver settings described by a run configuration.
pub fn solve_config(config: &RunConfig) -> SolveConfig {
    SolveConfig {
        closure: config.closure,
        method: config.method,
        convergence_dg: config.convergence.threshold,
        max_iterations: config.convergence.max_iterations,
        alpha: config.alpha,
        damping: Damping {
            h: config.damping.h,
            g: config.damping.g,
        },
        spectral: SpectralConfig {
            harmonics: config.spectral.harmonics,
            max_outer_iterations: config.spectral.max_outer_iterations,
            max_newton_iterations: config.spectral.max_newton_iterations,
            outer_threshold: config.spectral.outer_threshold,
        },
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn every_point_in_plan_is_in_range(
            t0 in 0.0f64..2.0, nt in 1usize..6,
            r0 in 0.01f64..0.5, nr in 1usize..8,
        ) {
            let temps: Vec<f64> = (0..nt).map(|k| t0 + 0.1 * k as f64).collect();
            let dens: Vec<f64> = (0..nr).map(|k| r0 + 0.05 * k as f64).collect();
            let plan = SweepPlan::new(temps.clone(), dens.clone());
            prop_assert_eq!(plan.points().count(), nt * nr);
            for p in plan.points() {
                prop_assert!(temps.contains(&p.temperature));
                prop_assert!(dens.contains(&p.density));
            }
        }
    }
}
