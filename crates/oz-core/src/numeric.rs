/// Floating point type used throughout the solver
pub type Real = f64;

/// Floor added to denominators of relative metrics.
pub const TINY: Real = 1e-10;

/// Finite value substituted for the log of a non-positive argument.
pub const LOG_SENTINEL: Real = -1e10;

/// Relative max-change metric between two iterates.
///
/// `max|new - old| / (mean|new| + 1e-10)`. Never divides by zero and is
/// non-negative for finite inputs; empty slices give 0.
pub fn relative_change(new: &[Real], old: &[Real]) -> Real {
    if new.is_empty() {
        return 0.0;
    }
    let max_diff = new
        .iter()
        .zip(old)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, Real::max);
    let mean_abs = new.iter().map(|v| v.abs()).sum::<Real>() / new.len() as Real;
    max_diff / (mean_abs + TINY)
}

/// Lennard-Jones pair energy `4 (r^-12 - r^-6)` in reduced units.
#[inline]
pub fn lennard_jones(r: Real) -> Real {
    let delta6 = (1.0 / r).powi(6);
    4.0 * (delta6 * delta6 - delta6)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn relative_change_is_non_negative(
            pairs in prop::collection::vec((-1e6_f64..1e6, -1e6_f64..1e6), 1..64)
        ) {
            let (new, old): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let dg = relative_change(&new, &old);
            prop_assert!(dg.is_finite());
            prop_assert!(dg >= 0.0);
        }
    }
}
