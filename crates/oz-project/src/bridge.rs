//! Tabulated bridge functions for the MHNC closure.
//!
//! One whitespace-separated table per density, named after the density times
//! 1000 as a four digit integer (`0370.txt` for 0.37). A missing or unreadable
//! table is not fatal: the solve proceeds with zeros and a warning.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Length of the zero table used when no file can be read.
pub const BRIDGE_FALLBACK_LEN: usize = 10_000;

/// Where the values of a [`BridgeTable`] came from.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeSource {
    Loaded { path: PathBuf },
    ZeroFallback { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BridgeTable {
    pub values: Vec<f64>,
    pub source: BridgeSource,
}

impl BridgeTable {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, BridgeSource::ZeroFallback { .. })
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

impl fmt::Display for BridgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeSource::Loaded { path } => write!(f, "{}", path.display()),
            BridgeSource::ZeroFallback { path, reason } => {
                write!(f, "zeros ({}: {reason})", path.display())
            }
        }
    }
}

/// `0370.txt` for density 0.37.
pub fn bridge_file_name(density: f64) -> String {
    format!("{:04}.txt", (density * 1000.0).round() as i64)
}

/// Read the table for `density` from `dir`, or fall back to zeros.
pub fn load_bridge_table(dir: &Path, density: f64) -> BridgeTable {
    let path = dir.join(bridge_file_name(density));
    match read_table(&path) {
        Ok(values) => BridgeTable {
            values,
            source: BridgeSource::Loaded { path },
        },
        Err(reason) => {
            warn!(
                path = %path.display(),
                %reason,
                "bridge table unavailable, using zeros"
            );
            BridgeTable {
                values: vec![0.0; BRIDGE_FALLBACK_LEN],
                source: BridgeSource::ZeroFallback { path, reason },
            }
        }
    }
}

fn read_table(path: &Path) -> Result<Vec<f64>, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let mut values = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("");
        for token in line.split_whitespace() {
            let v: f64 = token
                .parse()
                .map_err(|_| format!("line {}: not a number: {token}", lineno + 1))?;
            values.push(v);
        }
    }
    if values.is_empty() {
        return Err("empty table".to_string());
    }
    Ok(values)
}
