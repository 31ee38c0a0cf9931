//! Cubic spline with not-a-knot end conditions.
//!
//! The spline is stored as its second derivatives `M_i` at the nodes. Interior
//! nodes get the usual C2 continuity equations:
//!
//! ```text
//! h_{i-1} M_{i-1} + 2 (h_{i-1} + h_i) M_i + h_i M_{i+1} = 6 (d_i - d_{i-1})
//! ```
//!
//! with `h_i = x_{i+1} - x_i` and `d_i = (y_{i+1} - y_i) / h_i`. The two end rows
//! require the third derivative to be continuous across the second and the
//! second-to-last node. With four nodes this reproduces the single cubic
//! through all of them.
//!
//! The system is tiny (one row per calibration node), so it is assembled as a
//! dense matrix and solved with an LU decomposition.

use nalgebra::{DMatrix, DVector};

use crate::math::interp::bracket;

/// Solve for the node second derivatives.
///
/// Returns `None` if fewer than four nodes are given or the system is singular.
pub fn not_a_knot_moments(x: &[f64], y: &[f64]) -> Option<Vec<f64>> {
    let n = x.len();
    if n < 4 || y.len() != n {
        return None;
    }

    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let d: Vec<f64> = y
        .windows(2)
        .zip(h.iter())
        .map(|(w, hi)| (w[1] - w[0]) / hi)
        .collect();

    let mut a = DMatrix::<f64>::zeros(n, n);
    let mut b = DVector::<f64>::zeros(n);

    a[(0, 0)] = -h[1];
    a[(0, 1)] = h[0] + h[1];
    a[(0, 2)] = -h[0];

    for i in 1..n - 1 {
        a[(i, i - 1)] = h[i - 1];
        a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
        a[(i, i + 1)] = h[i];
        b[i] = 6.0 * (d[i] - d[i - 1]);
    }

    a[(n - 1, n - 3)] = -h[n - 2];
    a[(n - 1, n - 2)] = h[n - 3] + h[n - 2];
    a[(n - 1, n - 1)] = -h[n - 3];

    let m = a.lu().solve(&b)?;
    if m.iter().all(|v| v.is_finite()) {
        Some(m.iter().copied().collect())
    } else {
        None
    }
}

/// Evaluate the spline defined by nodes `(x, y)` and second derivatives `m`.
pub fn eval_cubic(x: &[f64], y: &[f64], m: &[f64], xq: f64) -> f64 {
    let i = bracket(x, xq);
    let h = x[i + 1] - x[i];
    let a = x[i + 1] - xq;
    let b = xq - x[i];

    m[i] * a.powi(3) / (6.0 * h)
        + m[i + 1] * b.powi(3) / (6.0 * h)
        + (y[i] / h - m[i] * h / 6.0) * a
        + (y[i + 1] / h - m[i + 1] * h / 6.0) * b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reproduces_a_cubic_polynomial() {
        // Not-a-knot splines are exact for cubics.
        let f = |x: f64| 1.0 - 2.0 * x + 0.5 * x * x + 3.0 * x * x * x;
        let x = vec![0.0, 0.15, 0.4, 0.7, 1.0];
        let y: Vec<f64> = x.iter().map(|&v| f(v)).collect();

        let m = not_a_knot_moments(&x, &y).unwrap();
        for &xq in &[0.0, 0.05, 0.33, 0.5, 0.91, 1.0] {
            let got = eval_cubic(&x, &y, &m, xq);
            assert!((got - f(xq)).abs() < 1e-9, "at x={xq}: got {got}, expected {}", f(xq));
        }
    }

    #[test]
    fn interpolates_nodes() {
        let x = vec![0.0, 0.1, 0.5, 0.9, 1.0];
        let y = vec![2.0, 2.0, 4.0, 4.0, 4.0];
        let m = not_a_knot_moments(&x, &y).unwrap();
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            assert!((eval_cubic(&x, &y, &m, xi) - yi).abs() < 1e-10);
        }
    }

    #[test]
    fn too_few_nodes_is_none() {
        assert!(not_a_knot_moments(&[0.0, 0.5, 1.0], &[1.0, 2.0, 3.0]).is_none());
    }
}
