//! Immutable 1-D interpolating curve over a padded calibration table.

use crate::domain::{PaddedTable, SplineKind};
use crate::error::StageError;
use crate::math::{eval_cubic, linear, nearest, next, not_a_knot_moments, previous};

/// A curve `x -> y` defined on `[x_first, x_last]` of its nodes.
///
/// Evaluating outside that range (or at NaN) is an error; the curve never
/// clamps or extrapolates.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatingCurve {
    kind: SplineKind,
    nodes: PaddedTable,
    /// Node second derivatives, only for `SplineKind::Cubic`.
    moments: Option<Vec<f64>>,
}

impl InterpolatingCurve {
    pub fn new(nodes: PaddedTable, kind: SplineKind) -> Result<Self, StageError> {
        let n = nodes.x.len();
        if n != nodes.y.len() {
            return Err(StageError::data("Curve nodes have mismatched x/y lengths."));
        }
        if n < kind.min_points() {
            return Err(StageError::data(format!(
                "`{kind}` interpolation needs at least {} nodes, got {n}.",
                kind.min_points()
            )));
        }
        if nodes.x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(StageError::data("Curve nodes must be strictly increasing in x."));
        }
        if nodes.x.iter().chain(nodes.y.iter()).any(|v| !v.is_finite()) {
            return Err(StageError::data("Curve nodes must be finite."));
        }

        let moments = match kind {
            SplineKind::Cubic => Some(
                not_a_knot_moments(&nodes.x, &nodes.y)
                    .ok_or_else(|| StageError::data("Cubic spline system is singular."))?,
            ),
            _ => None,
        };

        Ok(Self { kind, nodes, moments })
    }

    pub fn kind(&self) -> SplineKind {
        self.kind
    }

    pub fn nodes(&self) -> &PaddedTable {
        &self.nodes
    }

    /// Inclusive evaluation range.
    pub fn domain(&self) -> (f64, f64) {
        let x = &self.nodes.x;
        (x[0], x[x.len() - 1])
    }

    pub fn eval(&self, xq: f64) -> Result<f64, StageError> {
        let (lo, hi) = self.domain();
        if !(lo..=hi).contains(&xq) {
            return Err(StageError::data(format!(
                "Value {xq} is outside the interpolation range [{lo}, {hi}]."
            )));
        }

        let (x, y) = (&self.nodes.x, &self.nodes.y);
        let value = match (self.kind, &self.moments) {
            (SplineKind::Linear | SplineKind::Slinear, _) => linear(x, y, xq),
            (SplineKind::Nearest, _) => nearest(x, y, xq, false),
            (SplineKind::NearestUp, _) => nearest(x, y, xq, true),
            (SplineKind::Previous | SplineKind::Zero, _) => previous(x, y, xq),
            (SplineKind::Next, _) => next(x, y, xq),
            (SplineKind::Cubic, Some(m)) => eval_cubic(x, y, m, xq),
            (SplineKind::Cubic, None) => {
                return Err(StageError::data("Cubic curve is missing its spline moments."));
            }
        };
        Ok(value)
    }

    /// Evaluate at every value, failing on the first out-of-range one.
    pub fn eval_many(&self, values: &[f64]) -> Result<Vec<f64>, StageError> {
        values.iter().map(|&v| self.eval(v)).collect()
    }

    /// Evenly spaced samples over the domain, for plots and exports.
    pub fn sample_grid(&self, n: usize) -> Result<(Vec<f64>, Vec<f64>), StageError> {
        let n = n.max(2);
        let (lo, hi) = self.domain();
        let xs: Vec<f64> = (0..n)
            .map(|i| {
                let u = i as f64 / (n as f64 - 1.0);
                // Pin the last sample to the upper node to avoid rounding past it.
                if i == n - 1 { hi } else { lo + u * (hi - lo) }
            })
            .collect();
        let ys = self.eval_many(&xs)?;
        Ok((xs, ys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes() -> PaddedTable {
        PaddedTable {
            x: vec![0.0, 0.1, 0.5, 0.9, 1.0],
            y: vec![2.0, 2.0, 4.0, 4.0, 4.0],
        }
    }

    #[test]
    fn every_kind_hits_the_boundary_nodes() {
        for kind in SplineKind::ALL {
            let curve = InterpolatingCurve::new(nodes(), kind).unwrap();
            assert!((curve.eval(0.0).unwrap() - 2.0).abs() < 1e-12, "{kind} at 0");
            assert!((curve.eval(1.0).unwrap() - 4.0).abs() < 1e-12, "{kind} at 1");
        }
    }

    #[test]
    fn zero_kind_steps_like_previous() {
        let zero = InterpolatingCurve::new(nodes(), SplineKind::Zero).unwrap();
        let previous = InterpolatingCurve::new(nodes(), SplineKind::Previous).unwrap();
        for xq in [0.0, 0.05, 0.1, 0.3, 0.5, 0.7, 0.95, 1.0] {
            assert_eq!(zero.eval(xq).unwrap(), previous.eval(xq).unwrap(), "x = {xq}");
        }
        assert_eq!(zero.eval(0.3).unwrap(), 2.0);
    }

    #[test]
    fn out_of_domain_is_data_error() {
        let curve = InterpolatingCurve::new(nodes(), SplineKind::Linear).unwrap();
        assert!(matches!(curve.eval(-0.01), Err(StageError::Data(_))));
        assert!(matches!(curve.eval(1.01), Err(StageError::Data(_))));
        assert!(matches!(curve.eval(f64::NAN), Err(StageError::Data(_))));
    }

    #[test]
    fn cubic_needs_four_nodes() {
        let short = PaddedTable {
            x: vec![0.0, 0.5, 1.0],
            y: vec![1.0, 1.0, 1.0],
        };
        assert!(matches!(
            InterpolatingCurve::new(short.clone(), SplineKind::Cubic),
            Err(StageError::Data(_))
        ));
        assert!(InterpolatingCurve::new(short, SplineKind::Linear).is_ok());
    }

    #[test]
    fn sample_grid_spans_domain() {
        let curve = InterpolatingCurve::new(nodes(), SplineKind::Linear).unwrap();
        let (xs, ys) = curve.sample_grid(11).unwrap();
        assert_eq!(xs.len(), 11);
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[10], 1.0);
        assert!((ys[3] - 3.0).abs() < 1e-12);
    }
}
