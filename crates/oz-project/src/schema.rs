//! Run configuration schema.
//!
//! Every field has a default, so an empty document is a valid configuration
//! describing the standard Lennard-Jones sweep.

use oz_core::{ClosureKind, PotentialKind, SolutionMethod};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub version: u32,
    pub name: String,
    pub grid: GridDef,
    pub potential: PotentialKind,
    pub closure: ClosureKind,
    pub method: SolutionMethod,
    pub temperature: RangeDef,
    pub density: RangeDef,
    pub convergence: ConvergenceDef,
    /// Rogers-Young mixing parameter.
    pub alpha: f64,
    pub damping: DampingDef,
    pub spectral: SpectralDef,
    /// Directory holding `NNNN.txt` bridge tables, read for MHNC only.
    pub bridge_dir: PathBuf,
    /// Where finished sweeps are stored.
    pub results_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            version: crate::validate::LATEST_VERSION,
            name: "oz run".to_string(),
            grid: GridDef::default(),
            potential: PotentialKind::LennardJones,
            closure: ClosureKind::PercusYevick,
            method: SolutionMethod::RealSpace,
            temperature: RangeDef {
                start: 0.5,
                end: 2.0,
                step: 0.1,
            },
            density: RangeDef {
                start: 0.1,
                end: 0.9,
                step: 0.05,
            },
            convergence: ConvergenceDef::default(),
            alpha: 1.0,
            damping: DampingDef::default(),
            spectral: SpectralDef::default(),
            bridge_dir: PathBuf::from("data/bridg_func"),
            results_dir: PathBuf::from("runs"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridDef {
    pub points: usize,
    pub length: f64,
}

impl Default for GridDef {
    fn default() -> Self {
        Self {
            points: 500,
            length: 10.0,
        }
    }
}

/// Inclusive range `start, start + step, ..., end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RangeDef {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

/// Slack for the last point when `end - start` is not a whole number of steps.
const RANGE_SLACK: f64 = 1e-9;

impl RangeDef {
    pub fn single(value: f64) -> Self {
        Self {
            start: value,
            end: value,
            step: 1.0,
        }
    }

    pub fn len(&self) -> usize {
        if !(self.step > 0.0) || self.end < self.start {
            return 0;
        }
        ((self.end - self.start) / self.step + RANGE_SLACK).floor() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `k`-th value; computed from `start` so rounding does not accumulate.
    pub fn value(&self, k: usize) -> f64 {
        self.start + k as f64 * self.step
    }

    pub fn values(&self) -> Vec<f64> {
        (0..self.len()).map(|k| self.value(k)).collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConvergenceDef {
    pub threshold: f64,
    pub max_iterations: usize,
}

impl Default for ConvergenceDef {
    fn default() -> Self {
        Self {
            threshold: 1e-5,
            max_iterations: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DampingDef {
    pub h: f64,
    pub g: f64,
}

impl Default for DampingDef {
    fn default() -> Self {
        Self { h: 0.3, g: 0.2 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpectralDef {
    pub harmonics: usize,
    pub max_outer_iterations: usize,
    pub max_newton_iterations: usize,
    pub outer_threshold: f64,
}

impl Default for SpectralDef {
    fn default() -> Self {
        Self {
            harmonics: 48,
            max_outer_iterations: 300,
            max_newton_iterations: 100,
            outer_threshold: 1e-5,
        }
    }
}
