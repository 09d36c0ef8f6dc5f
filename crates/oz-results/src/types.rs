//! Result data types.

use crate::{SOLVER_VERSION, compute_run_id};
use oz_project::RunConfig;
use oz_sweep::{SweepOutcome, SweepPointResult};
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub name: String,
    pub timestamp: String,
    pub solver_version: String,
    pub potential: String,
    pub closure: String,
    pub method: String,
    pub grid_points: usize,
    pub domain_length: f64,
    pub total_points: usize,
    pub converged_points: usize,
    #[serde(default)]
    pub cancelled: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ThermoRecord {
    pub pressure: f64,
    pub pressure_moment: f64,
    pub energy: f64,
    pub chemical_potential: f64,
    pub temperature: f64,
    pub density: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileRecord {
    pub r: Vec<f64>,
    pub g: Vec<f64>,
    pub h: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointRecord {
    pub index: usize,
    pub temperature: f64,
    pub density: f64,
    pub status: String,
    pub iterations: usize,
    pub dg: Option<f64>,
    pub g_max: f64,
    pub h_max: f64,
    #[serde(default)]
    pub bridge_fallback: bool,
    pub thermo: ThermoRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileRecord>,
}

impl PointRecord {
    pub fn from_point(point: &SweepPointResult, with_profile: bool) -> Self {
        let t = &point.thermo;
        Self {
            index: point.index,
            temperature: point.point.temperature,
            density: point.point.density,
            status: point.status.as_str().to_string(),
            iterations: point.iterations,
            dg: point.dg,
            g_max: point.g_max,
            h_max: point.h_max,
            bridge_fallback: point.bridge_fallback,
            thermo: ThermoRecord {
                pressure: t.pressure,
                pressure_moment: t.pressure_moment,
                energy: t.energy,
                chemical_potential: t.chemical_potential,
                temperature: t.temperature,
                density: t.density,
            },
            profile: with_profile.then(|| ProfileRecord {
                r: point.r.clone(),
                g: point.g.clone(),
                h: point.h.clone(),
            }),
        }
    }
}

/// A whole run: manifest plus one record per solved point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub manifest: RunManifest,
    pub points: Vec<PointRecord>,
}

impl RunRecord {
    /// Stamp a finished sweep with its content id and the current time.
    pub fn from_outcome(config: &RunConfig, outcome: &SweepOutcome, with_profiles: bool) -> Self {
        let manifest = RunManifest {
            run_id: compute_run_id(config, SOLVER_VERSION),
            name: config.name.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            solver_version: SOLVER_VERSION.to_string(),
            potential: config.potential.as_str().to_string(),
            closure: config.closure.as_str().to_string(),
            method: config.method.as_str().to_string(),
            grid_points: config.grid.points,
            domain_length: config.grid.length,
            total_points: outcome.total,
            converged_points: outcome.num_converged(),
            cancelled: outcome.cancelled,
        };
        let points = outcome
            .points
            .iter()
            .map(|p| PointRecord::from_point(p, with_profiles))
            .collect();
        Self { manifest, points }
    }
}
