//! Run configuration validation.
//!
//! Runs on load and on save, so a config that reaches a solver is always
//! structurally sound.

use crate::schema::{RangeDef, RunConfig};
use oz_core::SolutionMethod;

pub const LATEST_VERSION: u32 = 1;

/// Most values one temperature or density range may expand to.
pub const MAX_RANGE_POINTS: usize = 100_000;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_config(config: &RunConfig) -> Result<(), ValidationError> {
    if config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    if config.grid.points < 2 {
        return Err(invalid("grid.points", config.grid.points, "need at least 2 points"));
    }
    if !(config.grid.length.is_finite() && config.grid.length > 0.0) {
        return Err(invalid("grid.length", config.grid.length, "must be positive"));
    }

    validate_range("temperature", &config.temperature, 0.0, true)?;
    validate_range("density", &config.density, 0.0, false)?;

    let conv = &config.convergence;
    if !(conv.threshold.is_finite() && conv.threshold > 0.0) {
        return Err(invalid("convergence.threshold", conv.threshold, "must be positive"));
    }
    if conv.max_iterations == 0 {
        return Err(invalid("convergence.max_iterations", 0, "must be at least 1"));
    }
    if !(config.alpha > 0.0 && config.alpha <= 2.0) {
        return Err(invalid("alpha", config.alpha, "must lie in (0, 2]"));
    }
    for (field, value) in [("damping.h", config.damping.h), ("damping.g", config.damping.g)] {
        if !(value > 0.0 && value <= 1.0) {
            return Err(invalid(field, value, "must lie in (0, 1]"));
        }
    }

    if config.method.is_spectral() {
        let spectral = &config.spectral;
        if !(spectral.outer_threshold.is_finite() && spectral.outer_threshold > 0.0) {
            return Err(invalid(
                "spectral.outer_threshold",
                spectral.outer_threshold,
                "must be positive",
            ));
        }
        if spectral.max_outer_iterations == 0 {
            return Err(invalid("spectral.max_outer_iterations", 0, "must be at least 1"));
        }
        if config.method == SolutionMethod::Lm {
            if spectral.harmonics == 0 || spectral.harmonics >= config.grid.points {
                return Err(invalid(
                    "spectral.harmonics",
                    spectral.harmonics,
                    "must be at least 1 and below grid.points",
                ));
            }
            if spectral.max_newton_iterations == 0 {
                return Err(invalid("spectral.max_newton_iterations", 0, "must be at least 1"));
            }
        }
    }

    Ok(())
}

fn validate_range(
    field: &str,
    range: &RangeDef,
    lower: f64,
    inclusive: bool,
) -> Result<(), ValidationError> {
    let RangeDef { start, end, step } = *range;
    if !(start.is_finite() && end.is_finite() && step.is_finite()) {
        return Err(invalid(field, format!("{start}..{end} step {step}"), "must be finite"));
    }
    let above = if inclusive { start >= lower } else { start > lower };
    if !above {
        return Err(invalid(field, start, "start out of range"));
    }
    if step <= 0.0 {
        return Err(invalid(field, step, "step must be positive"));
    }
    if end < start {
        return Err(invalid(field, end, "end below start"));
    }
    if (end - start) / step >= MAX_RANGE_POINTS as f64 {
        return Err(invalid(
            field,
            format!("{start}..{end} step {step}"),
            "too many points",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::GridDef;

    #[test]
    fn default_is_valid() {
        validate_config(&RunConfig::default()).unwrap();
    }

    #[test]
    fn rejects_invalid_values() {
        let base = RunConfig::default();
        let mut cases = Vec::new();

        let mut c = base.clone();
        c.grid = GridDef {
            points: 1,
            length: 10.0,
        };
        cases.push(c);

        let mut c = base.clone();
        c.grid.length = 0.0;
        cases.push(c);

        let mut c = base.clone();
        c.density.start = 0.0;
        cases.push(c);

        let mut c = base.clone();
        c.temperature.step = -0.1;
        cases.push(c);

        let mut c = base.clone();
        c.alpha = 0.0;
        cases.push(c);

        let mut c = base.clone();
        c.damping.g = 1.5;
        cases.push(c);

        let mut c = base.clone();
        c.method = SolutionMethod::Lm;
        c.spectral.harmonics = 500;
        cases.push(c);

        let mut c = base.clone();
        c.version = LATEST_VERSION + 1;
        cases.push(c);

        for case in cases {
            assert!(validate_config(&case).is_err(), "{case:?}");
        }
    }

    #[test]
    fn rejects_oversized_ranges() {
        let mut c = RunConfig::default();
        c.density = RangeDef {
            start: 0.1,
            end: 0.9,
            step: 1e-18,
        };
        let err = validate_config(&c).unwrap_err();
        assert!(err.to_string().contains("too many points"), "{err}");

        c.density = RangeDef {
            start: 1.0,
            end: MAX_RANGE_POINTS as f64,
            step: 1.0,
        };
        assert_eq!(c.density.len(), MAX_RANGE_POINTS);
        validate_config(&c).unwrap();
    }

    #[test]
    fn zero_temperature_is_allowed() {
        let mut c = RunConfig::default();
        c.temperature = RangeDef::single(0.0);
        validate_config(&c).unwrap();
    }
}
