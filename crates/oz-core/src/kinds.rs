//! Selectors fixed for the duration of one solve.

use crate::OzError;
use core::fmt;
use core::str::FromStr;

/// Closure relation used to close the Ornstein-Zernike equation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClosureKind {
    /// Percus-Yevick
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "PY"))]
    PercusYevick,
    /// Hypernetted chain
    #[cfg_attr(feature = "serde", serde(rename = "HNC"))]
    Hnc,
    /// Modified HNC with an externally tabulated bridge function
    #[cfg_attr(feature = "serde", serde(rename = "MHNC"))]
    ModifiedHnc,
    /// Martynov-Sarkisov
    #[cfg_attr(feature = "serde", serde(rename = "MS"))]
    MartynovSarkisov,
    /// Martynov-Sarkisov shifted by the scaled potential term
    #[cfg_attr(feature = "serde", serde(rename = "MS_MOD"))]
    MartynovSarkisovModified,
    /// Rogers-Young mixing of PY and HNC
    #[cfg_attr(feature = "serde", serde(rename = "RY"))]
    RogersYoung,
}

impl ClosureKind {
    pub const ALL: [ClosureKind; 6] = [
        ClosureKind::PercusYevick,
        ClosureKind::Hnc,
        ClosureKind::ModifiedHnc,
        ClosureKind::MartynovSarkisov,
        ClosureKind::MartynovSarkisovModified,
        ClosureKind::RogersYoung,
    ];

    /// Legacy integer code (PY = 1 ... RY = 6).
    pub fn code(self) -> u8 {
        match self {
            ClosureKind::PercusYevick => 1,
            ClosureKind::Hnc => 2,
            ClosureKind::ModifiedHnc => 3,
            ClosureKind::MartynovSarkisov => 4,
            ClosureKind::MartynovSarkisovModified => 5,
            ClosureKind::RogersYoung => 6,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, OzError> {
        ClosureKind::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or_else(|| OzError::Unknown {
                what: "closure code",
                value: code.to_string(),
            })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClosureKind::PercusYevick => "PY",
            ClosureKind::Hnc => "HNC",
            ClosureKind::ModifiedHnc => "MHNC",
            ClosureKind::MartynovSarkisov => "MS",
            ClosureKind::MartynovSarkisovModified => "MS_MOD",
            ClosureKind::RogersYoung => "RY",
        }
    }

    /// Whether the closure consumes a tabulated bridge function.
    pub fn needs_bridge_table(self) -> bool {
        matches!(self, ClosureKind::ModifiedHnc)
    }
}

impl fmt::Display for ClosureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClosureKind {
    type Err = OzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::from_code(code);
        }
        ClosureKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| OzError::Unknown {
                what: "closure",
                value: trimmed.to_string(),
            })
    }
}

/// Pair potential between particles, in reduced units (sigma = epsilon = 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PotentialKind {
    #[default]
    LennardJones,
    HardSphere,
}

impl PotentialKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PotentialKind::LennardJones => "LJ",
            PotentialKind::HardSphere => "HS",
        }
    }
}

impl fmt::Display for PotentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PotentialKind {
    type Err = OzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lj" | "lennard_jones" | "lennard-jones" => Ok(PotentialKind::LennardJones),
            "hs" | "hard_sphere" | "hard-sphere" => Ok(PotentialKind::HardSphere),
            other => Err(OzError::Unknown {
                what: "potential",
                value: other.to_string(),
            }),
        }
    }
}

/// Iteration scheme used to drive the solution to self-consistency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolutionMethod {
    /// Damped fixed-point iteration with a cumulative integral correction.
    #[default]
    RealSpace,
    /// Direct iteration in the sine-transform representation.
    Fourier,
    /// Fourier iteration with a Newton-refined low-harmonic band.
    Lm,
}

impl SolutionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            SolutionMethod::RealSpace => "real_space",
            SolutionMethod::Fourier => "fourier",
            SolutionMethod::Lm => "lm",
        }
    }

    pub fn is_spectral(self) -> bool {
        !matches!(self, SolutionMethod::RealSpace)
    }
}

impl fmt::Display for SolutionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolutionMethod {
    type Err = OzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "real_space" | "real-space" | "numerical" => Ok(SolutionMethod::RealSpace),
            "fourier" => Ok(SolutionMethod::Fourier),
            "lm" => Ok(SolutionMethod::Lm),
            other => Err(OzError::Unknown {
                what: "solution method",
                value: other.to_string(),
            }),
        }
    }
}
