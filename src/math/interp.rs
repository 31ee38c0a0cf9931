//! Piecewise interpolation primitives over strictly increasing nodes.
//!
//! All functions assume `x.len() == y.len() >= 2`, `x` strictly increasing and
//! `x[0] <= xq <= x[n-1]`. Domain checks happen one level up, in the curve.

/// Index `i` of the interval `[x[i], x[i+1]]` containing `xq`.
///
/// Queries equal to the last node map to the last interval.
pub fn bracket(x: &[f64], xq: f64) -> usize {
    let idx = x.partition_point(|v| *v <= xq);
    idx.saturating_sub(1).min(x.len() - 2)
}

/// Piecewise-linear interpolation.
pub fn linear(x: &[f64], y: &[f64], xq: f64) -> f64 {
    let i = bracket(x, xq);
    let (x0, x1) = (x[i], x[i + 1]);
    let w = (xq - x0) / (x1 - x0);
    (1.0 - w) * y[i] + w * y[i + 1]
}

/// Value of the closest node.
///
/// A query exactly halfway between two nodes takes the lower node, or the
/// upper node when `ties_up` is set.
pub fn nearest(x: &[f64], y: &[f64], xq: f64, ties_up: bool) -> f64 {
    // Number of interval midpoints strictly below (or at, for ties_up) xq is
    // the index of the closest node.
    let idx = x
        .windows(2)
        .map(|w| 0.5 * (w[0] + w[1]))
        .filter(|mid| if ties_up { *mid <= xq } else { *mid < xq })
        .count();
    y[idx.min(y.len() - 1)]
}

/// Value of the last node at or below `xq`.
pub fn previous(x: &[f64], y: &[f64], xq: f64) -> f64 {
    let idx = x.partition_point(|v| *v <= xq);
    y[idx.saturating_sub(1)]
}

/// Value of the first node at or above `xq`.
pub fn next(x: &[f64], y: &[f64], xq: f64) -> f64 {
    let idx = x.partition_point(|v| *v < xq);
    y[idx.min(y.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: [f64; 4] = [0.0, 0.2, 0.6, 1.0];
    const Y: [f64; 4] = [1.0, 3.0, 2.0, 5.0];

    #[test]
    fn linear_hits_nodes_and_midpoints() {
        for (&xi, &yi) in X.iter().zip(Y.iter()) {
            assert!((linear(&X, &Y, xi) - yi).abs() < 1e-12, "at x={xi}");
        }
        assert!((linear(&X, &Y, 0.1) - 2.0).abs() < 1e-12);
        assert!((linear(&X, &Y, 0.8) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn nearest_resolves_ties_by_direction() {
        assert_eq!(nearest(&X, &Y, 0.1, false), 1.0);
        assert_eq!(nearest(&X, &Y, 0.1, true), 3.0);
        assert_eq!(nearest(&X, &Y, 0.39, false), 3.0);
        assert_eq!(nearest(&X, &Y, 1.0, false), 5.0);
    }

    #[test]
    fn previous_and_next_step_functions() {
        assert_eq!(previous(&X, &Y, 0.5), 3.0);
        assert_eq!(previous(&X, &Y, 0.6), 2.0);
        assert_eq!(previous(&X, &Y, 0.0), 1.0);
        assert_eq!(next(&X, &Y, 0.5), 2.0);
        assert_eq!(next(&X, &Y, 0.6), 2.0);
        assert_eq!(next(&X, &Y, 1.0), 5.0);
    }
}
