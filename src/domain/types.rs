//! Shared domain types.
//!
//! The curve file types are serializable so a built curve can be exported to
//! JSON and reloaded later for plotting.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StageError;

/// Prefix marking a truth-level variable (e.g. `true_coszen`).
pub const TRUTH_PREFIX: &str = "true_";

/// The only variable the muon spectral-index systematic is tabulated in.
pub const SUPPORTED_BARE_VARIABLE: &str = "coszen";

/// An event variable name split into its bare name and truth marker.
///
/// `true_coszen` becomes `{ bare_name: "coszen", is_truth_level: true }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSpec {
    /// Name as configured; this is the key looked up in event batches.
    pub raw_name: String,
    pub bare_name: String,
    pub is_truth_level: bool,
}

impl VariableSpec {
    pub fn parse(raw_name: &str) -> Self {
        let (bare_name, is_truth_level) = match raw_name.strip_prefix(TRUTH_PREFIX) {
            Some(rest) => (rest.to_string(), true),
            None => (raw_name.to_string(), false),
        };
        Self {
            raw_name: raw_name.to_string(),
            bare_name,
            is_truth_level,
        }
    }
}

/// Interpolation kind used to build the uncertainty curve.
///
/// Names follow the usual 1-D interpolation vocabulary (`linear`, `cubic`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplineKind {
    Linear,
    /// First-order spline; evaluates identically to `Linear`.
    Slinear,
    /// Nearest node, ties resolved towards the lower node.
    Nearest,
    /// Nearest node, ties resolved towards the upper node.
    NearestUp,
    /// Value of the node at or below `x`.
    Previous,
    /// Value of the node at or above `x`.
    Next,
    /// Zeroth-order spline; evaluates identically to `Previous`.
    Zero,
    /// Cubic spline with not-a-knot end conditions.
    Cubic,
}

impl SplineKind {
    pub const ALL: [SplineKind; 8] = [
        SplineKind::Linear,
        SplineKind::Slinear,
        SplineKind::Nearest,
        SplineKind::NearestUp,
        SplineKind::Previous,
        SplineKind::Next,
        SplineKind::Zero,
        SplineKind::Cubic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SplineKind::Linear => "linear",
            SplineKind::Slinear => "slinear",
            SplineKind::Nearest => "nearest",
            SplineKind::NearestUp => "nearest-up",
            SplineKind::Previous => "previous",
            SplineKind::Next => "next",
            SplineKind::Zero => "zero",
            SplineKind::Cubic => "cubic",
        }
    }

    /// Minimum number of nodes the kind needs.
    pub fn min_points(self) -> usize {
        match self {
            SplineKind::Cubic => 4,
            _ => 2,
        }
    }
}

impl fmt::Display for SplineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplineKind {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SplineKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = SplineKind::ALL.iter().map(|k| k.as_str()).collect();
                StageError::config(format!(
                    "Unsupported spline kind '{s}'. Expected one of: {}.",
                    known.join(", ")
                ))
            })
    }
}

/// Calibration data as read from the resource: x ascending, one y per x.
#[derive(Debug, Clone, PartialEq)]
pub struct UncertaintyTable {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl UncertaintyTable {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Calibration data with synthetic nodes at the domain edges `0.0` and `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddedTable {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl PaddedTable {
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Everything the `reweight` pipeline needs, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub table_file: String,
    pub variable: String,
    pub spline_kind: String,
    pub atm_muon_scale: f64,
    pub delta_gamma_mu: f64,
    /// Unit string shared by the two numeric parameters.
    pub units: String,

    pub batch_names: Vec<String>,
    pub n_events: usize,
    pub random_weights: bool,
    pub seed: u64,
    pub coszen_min: f64,
    pub coszen_max: f64,

    pub export_events: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub variable: VariableSpec,
    pub kind: SplineKind,
    pub nodes: PaddedTable,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truth_prefix_is_split_off() {
        let spec = VariableSpec::parse("true_coszen");
        assert_eq!(spec.bare_name, "coszen");
        assert!(spec.is_truth_level);
        assert_eq!(spec.raw_name, "true_coszen");

        let spec = VariableSpec::parse("coszen");
        assert_eq!(spec.bare_name, "coszen");
        assert!(!spec.is_truth_level);
    }

    #[test]
    fn spline_kind_parses_known_names() {
        assert_eq!("linear".parse::<SplineKind>().unwrap(), SplineKind::Linear);
        assert_eq!("nearest-up".parse::<SplineKind>().unwrap(), SplineKind::NearestUp);
        assert_eq!(" cubic ".parse::<SplineKind>().unwrap(), SplineKind::Cubic);
        assert_eq!("zero".parse::<SplineKind>().unwrap(), SplineKind::Zero);
    }

    #[test]
    fn spline_kind_rejects_unknown_names() {
        for name in ["quintic", "quadratic"] {
            let err = name.parse::<SplineKind>().unwrap_err();
            assert!(matches!(err, StageError::Configuration(_)));
        }
    }
}
