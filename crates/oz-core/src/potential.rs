//! Per-grid-point pair potential tables.

use crate::{Grid, PotentialKind, Real, lennard_jones};

/// Boltzmann factor `ExpU[i]` and potential energy `F2[i]` sampled on a grid.
///
/// Immutable for a fixed grid/potential pair; rebuild when either changes.
#[derive(Clone, Debug, PartialEq)]
pub struct PotentialTables {
    kind: PotentialKind,
    exp_u: Vec<Real>,
    f2: Vec<Real>,
}

impl PotentialTables {
    pub fn new(grid: &Grid, kind: PotentialKind) -> Self {
        let n = grid.len();
        let mut exp_u = Vec::with_capacity(n);
        let mut f2 = Vec::with_capacity(n);

        for &r in grid.r() {
            let (boltzmann, energy) = if r <= 0.0 {
                (0.0, 0.0)
            } else {
                match kind {
                    PotentialKind::LennardJones => {
                        let u = lennard_jones(r);
                        // Overflow at tiny r behaves like a hard core.
                        if u.is_finite() { ((-u).exp(), u) } else { (0.0, 0.0) }
                    }
                    PotentialKind::HardSphere => {
                        if r < 1.0 {
                            (0.0, 0.0)
                        } else {
                            (1.0, 0.0)
                        }
                    }
                }
            };
            exp_u.push(boltzmann);
            f2.push(energy);
        }

        Self { kind, exp_u, f2 }
    }

    #[inline]
    pub fn kind(&self) -> PotentialKind {
        self.kind
    }

    #[inline]
    pub fn exp_u(&self) -> &[Real] {
        &self.exp_u
    }

    #[inline]
    pub fn f2(&self) -> &[Real] {
        &self.f2
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.exp_u.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exp_u.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_sphere_tables() {
        let grid = Grid::new(100, 4.0).unwrap();
        let tables = PotentialTables::new(&grid, PotentialKind::HardSphere);
        for (r, e) in grid.r().iter().zip(tables.exp_u()) {
            if *r < 1.0 {
                assert_eq!(*e, 0.0);
            } else {
                assert_eq!(*e, 1.0);
            }
        }
        assert!(tables.f2().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn lennard_jones_tables_are_finite() {
        let grid = Grid::new(500, 10.0).unwrap();
        let tables = PotentialTables::new(&grid, PotentialKind::LennardJones);
        assert_eq!(tables.exp_u()[0], 0.0);
        assert_eq!(tables.f2()[0], 0.0);
        assert!(tables.exp_u().iter().all(|v| v.is_finite() && *v >= 0.0));
        assert!(tables.f2().iter().all(|v| v.is_finite()));
        // Well depth of -1 at r = 2^(1/6) gives ExpU close to e.
        let max = tables.exp_u().iter().cloned().fold(0.0, f64::max);
        assert!(max > 2.5 && max <= std::f64::consts::E + 1e-9);
    }
}
