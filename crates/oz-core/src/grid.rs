//! Uniform radial grid.

use crate::{OzError, OzResult, Real};

/// `N` equally spaced radial samples covering `[0, L)`.
///
/// `r[0] = 0` is a singular boundary point; solvers pin `g = 0`, `h = -1` there.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    length: Real,
    spacing: Real,
    r: Vec<Real>,
}

impl Grid {
    pub fn new(points: usize, length: Real) -> OzResult<Self> {
        if points < 2 {
            return Err(OzError::invalid(format!(
                "grid needs at least 2 points, got {points}"
            )));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(OzError::invalid(format!(
                "domain length must be positive and finite, got {length}"
            )));
        }

        let spacing = length / points as Real;
        let r = (0..points).map(|i| i as Real * spacing).collect();
        Ok(Self { length, spacing, r })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.r.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    #[inline]
    pub fn length(&self) -> Real {
        self.length
    }

    /// Grid spacing `d_R = L / N`.
    #[inline]
    pub fn spacing(&self) -> Real {
        self.spacing
    }

    #[inline]
    pub fn r(&self) -> &[Real] {
        &self.r
    }
}
