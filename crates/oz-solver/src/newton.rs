//! Newton solver with backtracking line search.
//!
//! Solves `F(x) = 0` for the correction `x` applied on top of a fixed `base`
//! vector. Convergence uses the same relative-change metric as the outer
//! iterations: `max|dx| / (mean|base + x| + 1e-10)`.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};
use oz_core::TINY;

/// Newton solver configuration.
#[derive(Clone, Copy, Debug)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Threshold on the relative step size
    pub tolerance: f64,
    /// Residual norm treated as an exact root
    pub abs_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-5,
            abs_tol: 1e-14,
            line_search_beta: 0.5,
            max_line_search_iters: 10,
        }
    }
}

/// Newton iteration result.
#[derive(Clone, Debug)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

fn relative_step(step: &DVector<f64>, base: &DVector<f64>, x: &DVector<f64>) -> f64 {
    if step.is_empty() {
        return 0.0;
    }
    let max_step = step.amax();
    let mean = base.iter().zip(x.iter()).map(|(b, v)| (b + v).abs()).sum::<f64>()
        / step.len() as f64;
    max_step / (mean + TINY)
}

/// Newton solve with line search.
///
/// Running out of iterations is reported through `converged = false`; only a
/// singular Jacobian is an error.
pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    base: &DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
    J: Fn(&DVector<f64>) -> DMatrix<f64>,
{
    let mut x = x0;
    let mut r = residual_fn(&x);
    let mut r_norm = r.norm();

    for iter in 0..config.max_iterations {
        if r_norm < config.abs_tol {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        let jac = jacobian_fn(&x);

        // Solve J * dx = -r
        let dx = jac
            .lu()
            .solve(&(-r.clone()))
            .ok_or_else(|| SolverError::Numeric {
                what: format!("band Jacobian is singular at Newton iteration {iter}"),
            })?;

        let mut alpha = 1.0;
        let mut x_new = &x + &dx;
        let mut r_new = residual_fn(&x_new);
        let mut r_new_norm = r_new.norm();

        for _ in 0..config.max_line_search_iters {
            if r_new_norm.is_finite() && r_new_norm < r_norm {
                break;
            }
            alpha *= config.line_search_beta;
            x_new = &x + alpha * &dx;
            r_new = residual_fn(&x_new);
            r_new_norm = r_new.norm();
        }

        if !r_new_norm.is_finite() {
            return Err(SolverError::Numeric {
                what: format!("band residual is not finite at Newton iteration {iter}"),
            });
        }

        let step = alpha * &dx;
        let converged = relative_step(&step, base, &x_new) < config.tolerance;

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;

        if converged {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter + 1,
                converged: true,
            });
        }
    }

    Ok(NewtonResult {
        x,
        residual_norm: r_norm,
        iterations: config.max_iterations,
        converged: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_quadratic() {
        // Solve (1 + x)^2 - 4 = 0 around base 1, x > -1
        let residual =
            |x: &DVector<f64>| DVector::from_element(1, (1.0 + x[0]) * (1.0 + x[0]) - 4.0);
        let jacobian = |x: &DVector<f64>| DMatrix::from_element(1, 1, 2.0 * (1.0 + x[0]));

        let x0 = DVector::from_element(1, 0.5);
        let base = DVector::from_element(1, 1.0);
        let config = NewtonConfig {
            tolerance: 1e-10,
            ..NewtonConfig::default()
        };
        let result = newton_solve(x0, &base, residual, jacobian, &config).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn linear_system_converges_in_one_step() {
        let a = DMatrix::from_row_slice(2, 2, &[3.0, 1.0, 1.0, 2.0]);
        let b = DVector::from_row_slice(&[9.0, 8.0]);
        let residual = |x: &DVector<f64>| &a * x - &b;
        let jacobian = |_: &DVector<f64>| a.clone();

        let base = DVector::zeros(2);
        let result =
            newton_solve(DVector::zeros(2), &base, residual, jacobian, &NewtonConfig::default())
                .unwrap();
        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-12);
        assert!((result.x[1] - 3.0).abs() < 1e-12);
        assert!(result.iterations <= 2);
    }

    #[test]
    fn singular_jacobian_is_an_error() {
        let residual = |_: &DVector<f64>| DVector::from_element(2, 1.0);
        let jacobian = |_: &DVector<f64>| DMatrix::zeros(2, 2);
        let base = DVector::zeros(2);
        let err = newton_solve(DVector::zeros(2), &base, residual, jacobian, &NewtonConfig::default())
            .unwrap_err();
        assert!(matches!(err, SolverError::Numeric { .. }));
    }
}
