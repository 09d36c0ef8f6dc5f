//! Discrete sine transforms.
//!
//! `forward` is the unnormalized type-II DST and `inverse` is the type-III DST
//! divided by `2N`, so `inverse(forward(x)) == x` up to rounding:
//!
//! ```text
//! forward(x)[k] = 2 sum_n x[n] sin(pi (k+1) (2n+1) / 2N)
//! inverse(y)[n] = ((-1)^n y[N-1] + 2 sum_{k<N-1} y[k] sin(pi (k+1) (2n+1) / 2N)) / 2N
//! ```

use oz_core::Real;
use std::f64::consts::PI;

/// Sine transform with a precomputed `N x N` kernel.
#[derive(Clone, Debug)]
pub struct SineTransform {
    n: usize,
    /// Row `k`, column `n`: `sin(pi (k+1) (2n+1) / 2N)`.
    kernel: Vec<Real>,
}

impl SineTransform {
    pub fn new(n: usize) -> Self {
        let mut kernel = Vec::with_capacity(n * n);
        let denom = 2.0 * n as Real;
        for k in 0..n {
            for j in 0..n {
                let arg = PI * (k + 1) as Real * (2 * j + 1) as Real / denom;
                kernel.push(arg.sin());
            }
        }
        Self { n, kernel }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    fn row(&self, k: usize) -> &[Real] {
        &self.kernel[k * self.n..(k + 1) * self.n]
    }

    pub fn forward_into(&self, x: &[Real], out: &mut [Real]) {
        debug_assert_eq!(x.len(), self.n);
        debug_assert_eq!(out.len(), self.n);
        for (k, y) in out.iter_mut().enumerate() {
            let dot: Real = self.row(k).iter().zip(x).map(|(s, v)| s * v).sum();
            *y = 2.0 * dot;
        }
    }

    pub fn inverse_into(&self, y: &[Real], out: &mut [Real]) {
        debug_assert_eq!(y.len(), self.n);
        debug_assert_eq!(out.len(), self.n);
        let n = self.n;
        out.iter_mut().for_each(|v| *v = 0.0);
        if n == 0 {
            return;
        }
        for k in 0..n {
            // The last harmonic enters the type-III sum with half weight.
            let weight = if k + 1 == n { 1.0 } else { 2.0 };
            let coeff = weight * y[k];
            if coeff == 0.0 {
                continue;
            }
            for (o, s) in out.iter_mut().zip(self.row(k)) {
                *o += coeff * s;
            }
        }
        let norm = 1.0 / (2.0 * n as Real);
        out.iter_mut().for_each(|v| *v *= norm);
    }

    pub fn forward(&self, x: &[Real]) -> Vec<Real> {
        let mut out = vec![0.0; self.n];
        self.forward_into(x, &mut out);
        out
    }

    pub fn inverse(&self, y: &[Real]) -> Vec<Real> {
        let mut out = vec![0.0; self.n];
        self.inverse_into(y, &mut out);
        out
    }

    /// Cosine moments `(1/N) sum_n d[n] cos(pi m (2n+1) / 2N)` for `m < out.len()`.
    ///
    /// Products of two kernel rows reduce to differences of these moments.
    pub fn cosine_moments_into(&self, d: &[Real], out: &mut [Real]) {
        debug_assert_eq!(d.len(), self.n);
        let denom = 2.0 * self.n as Real;
        let inv_n = 1.0 / self.n as Real;
        for (m, p) in out.iter_mut().enumerate() {
            let sum: Real = d
                .iter()
                .enumerate()
                .map(|(j, v)| v * (PI * m as Real * (2 * j + 1) as Real / denom).cos())
                .sum();
            *p = sum * inv_n;
        }
    }
}
