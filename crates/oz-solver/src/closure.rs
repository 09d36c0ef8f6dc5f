//! Closure relations.
//!
//! Maps a correlation value to the potential-like quantity `omega` used to
//! rebuild `h = exp(-u) exp(omega) - 1`. Every branch is allocation-free and
//! returns a finite value for finite input: non-physical arguments map to
//! [`LOG_SENTINEL`] or are clamped.

use oz_core::{ClosureKind, LOG_SENTINEL, Real, TINY};

/// Cap on the Rogers-Young mixing exponent.
pub const RY_EXPONENT_CAP: Real = 100.0;

/// Below this |g| the PY logarithm switches to its Taylor series.
const PY_TAYLOR_THRESHOLD: Real = 1e-10;

/// Point data a closure may consult besides the correlation value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosureArgs {
    pub density: Real,
    /// Pair potential already scaled by the temperature.
    pub f2: Real,
    pub temperature: Real,
    /// Radial coordinate, only read by Rogers-Young.
    pub r: Real,
    /// Rogers-Young mixing parameter in (0, 2].
    pub alpha: Real,
}

impl ClosureArgs {
    /// `density * f2 / temperature`, zero at vanishing temperature.
    #[inline]
    pub(crate) fn potential_shift(&self) -> Real {
        if self.temperature > TINY {
            self.density * self.f2 / self.temperature
        } else {
            0.0
        }
    }

    /// `exp(min(alpha (1 - r), 100)) - 1`.
    #[inline]
    pub fn ry_mixing(&self) -> Real {
        (self.alpha * (1.0 - self.r)).min(RY_EXPONENT_CAP).exp() - 1.0
    }
}

/// Evaluate the closure relation at one point.
#[inline]
pub fn omega(kind: ClosureKind, g: Real, args: ClosureArgs) -> Real {
    match kind {
        ClosureKind::PercusYevick => {
            if g.abs() < PY_TAYLOR_THRESHOLD {
                g - 0.5 * g * g
            } else {
                let val = 1.0 + g;
                if val > 0.0 { val.ln() } else { LOG_SENTINEL }
            }
        }
        ClosureKind::Hnc => g,
        // Bridge values are added by the caller.
        ClosureKind::ModifiedHnc => g * (1.0 + 0.5 * g),
        ClosureKind::MartynovSarkisov => {
            let val = 1.0 + 2.0 * g;
            if val >= 0.0 { -1.0 + val.sqrt() } else { -1.0 }
        }
        ClosureKind::MartynovSarkisovModified => {
            let shift = args.potential_shift();
            let val = 1.0 + 2.0 * (g - shift);
            -1.0 + shift + val.max(0.0).sqrt()
        }
        ClosureKind::RogersYoung => {
            let term = (1.0 + args.ry_mixing() * g).min(Real::MAX);
            if term > TINY { term.ln() } else { LOG_SENTINEL }
        }
    }
}

/// Derivative `d omega / d g`, zero on every clamped or sentinel branch.
#[inline]
pub fn omega_derivative(kind: ClosureKind, g: Real, args: ClosureArgs) -> Real {
    match kind {
        ClosureKind::PercusYevick => {
            if g.abs() < PY_TAYLOR_THRESHOLD {
                1.0 - g
            } else {
                let val = 1.0 + g;
                if val > 0.0 { 1.0 / val } else { 0.0 }
            }
        }
        ClosureKind::Hnc => 1.0,
        ClosureKind::ModifiedHnc => 1.0 + g,
        ClosureKind::MartynovSarkisov => {
            let val = 1.0 + 2.0 * g;
            if val > TINY { 1.0 / val.sqrt() } else { 0.0 }
        }
        ClosureKind::MartynovSarkisovModified => {
            let val = 1.0 + 2.0 * (g - args.potential_shift());
            if val > TINY { 1.0 / val.sqrt() } else { 0.0 }
        }
        ClosureKind::RogersYoung => {
            let mixing = args.ry_mixing();
            let term = 1.0 + mixing * g;
            if term > TINY { mixing / term } else { 0.0 }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ClosureArgs {
        ClosureArgs {
            density: 0.5,
            f2: 0.3,
            temperature: 1.2,
            r: 1.5,
            alpha: 1.0,
        }
    }

    #[test]
    fn py_taylor_and_log_agree_near_zero() {
        for g in [1e-11, -1e-11, 9.9e-11, 1.01e-10, -1.01e-10, 1e-9, -1e-8, 1e-6] {
            let value = omega(ClosureKind::PercusYevick, g, args());
            assert!((value - (1.0_f64 + g).ln()).abs() < 1e-8, "g = {g}");
            assert!((value - (g - 0.5 * g * g)).abs() < 1e-8, "g = {g}");
        }
    }

    #[test]
    fn py_non_physical_region_is_sentinel() {
        assert_eq!(omega(ClosureKind::PercusYevick, -1.0, args()), LOG_SENTINEL);
        assert_eq!(omega(ClosureKind::PercusYevick, -3.5, args()), LOG_SENTINEL);
    }

    #[test]
    fn hnc_and_mhnc() {
        assert_eq!(omega(ClosureKind::Hnc, 0.7, args()), 0.7);
        assert!((omega(ClosureKind::ModifiedHnc, 0.4, args()) - 0.48).abs() < 1e-15);
    }

    #[test]
    fn ms_is_clamped_below_branch_point() {
        assert!((omega(ClosureKind::MartynovSarkisov, 1.5, args()) - 1.0).abs() < 1e-15);
        assert_eq!(omega(ClosureKind::MartynovSarkisov, -0.6, args()), -1.0);
    }

    #[test]
    fn ms_mod_shifts_by_potential_term() {
        let a = args();
        let shift = a.density * a.f2 / a.temperature;
        let expected = -1.0 + shift + (1.0 + 2.0 * (0.2 - shift)).sqrt();
        let value = omega(ClosureKind::MartynovSarkisovModified, 0.2, a);
        assert!((value - expected).abs() < 1e-14);

        // Negative square-root argument clamps to zero rather than a sentinel.
        let clamped = omega(ClosureKind::MartynovSarkisovModified, -5.0, a);
        assert!((clamped - (-1.0 + shift)).abs() < 1e-14);
    }

    #[test]
    fn ms_mod_at_zero_temperature_is_finite() {
        let a = ClosureArgs {
            temperature: 0.0,
            ..args()
        };
        assert!(omega(ClosureKind::MartynovSarkisovModified, 0.0, a).is_finite());
        assert!(omega_derivative(ClosureKind::MartynovSarkisovModified, 0.0, a).is_finite());
    }

    #[test]
    fn ry_mixing_vanishes_at_contact() {
        let a = ClosureArgs { r: 1.0, ..args() };
        // Mixing factor vanishes at r = 1, leaving ln(1) = 0.
        assert_eq!(omega(ClosureKind::RogersYoung, 3.0, a), 0.0);
        let far = ClosureArgs { r: 1000.0, ..args() };
        assert_eq!(omega(ClosureKind::RogersYoung, 1.0, far), LOG_SENTINEL);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let eps = 1e-6;
        for kind in ClosureKind::ALL {
            let g = 0.35;
            let numeric = (omega(kind, g + eps, args()) - omega(kind, g - eps, args())) / (2.0 * eps);
            let analytic = omega_derivative(kind, g, args());
            assert!(
                (numeric - analytic).abs() < 1e-6,
                "{kind}: numeric {numeric} vs analytic {analytic}"
            );
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn py_is_always_finite(g in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
            let value = omega(ClosureKind::PercusYevick, g, ClosureArgs {
                density: 0.5, f2: 0.0, temperature: 1.0, r: 1.0, alpha: 1.0,
            });
            prop_assert!(value.is_finite());
        }

        #[test]
        fn ry_mixing_exponent_is_capped(alpha in 1e-6_f64..=2.0, r in 0.0_f64..=1000.0) {
            let args = ClosureArgs { density: 0.5, f2: 0.0, temperature: 1.0, r, alpha };
            prop_assert!(args.ry_mixing() <= RY_EXPONENT_CAP.exp() - 1.0);
            prop_assert!(args.ry_mixing().is_finite());
            let value = omega(ClosureKind::RogersYoung, 0.5, args);
            prop_assert!(value.is_finite());
        }

        #[test]
        fn bounded_inputs_never_give_nan(
            g in -10.0_f64..10.0,
            f2 in -5.0_f64..5.0,
            temperature in 0.0_f64..5.0,
            r in 0.0_f64..20.0,
        ) {
            let args = ClosureArgs { density: 0.8, f2, temperature, r, alpha: 1.0 };
            for kind in ClosureKind::ALL {
                prop_assert!(omega(kind, g, args).is_finite());
                prop_assert!(omega_derivative(kind, g, args).is_finite());
            }
        }
    }
}
