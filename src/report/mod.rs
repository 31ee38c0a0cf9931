//! Reporting utilities: per-batch weight summaries and formatted terminal output.
//!
//! Formatting lives here so the stage and curve code stay free of presentation.

use crate::curve::InterpolatingCurve;
use crate::error::StageError;
use crate::events::{EventSet, WEIGHTS};
use crate::stage::BatchNorm;

/// Weight totals for one batch around a single `apply`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub name: String,
    pub n_events: usize,
    pub norm: f64,
    pub weight_sum_before: f64,
    pub weight_sum_after: f64,
    /// Events whose weight was clamped to zero.
    pub n_zeroed: usize,
}

impl BatchSummary {
    /// `after / before`, or `None` when the batch started with zero weight.
    pub fn ratio(&self) -> Option<f64> {
        if self.weight_sum_before > 0.0 {
            Some(self.weight_sum_after / self.weight_sum_before)
        } else {
            None
        }
    }
}

/// Sum of `weights` per batch, in batch order.
pub fn weight_sums(events: &EventSet) -> Result<Vec<f64>, StageError> {
    events
        .batches()
        .iter()
        .map(|b| b.get(WEIGHTS).map(|w| w.iter().sum::<f64>()))
        .collect()
}

/// Combine pre-apply sums, post-apply weights and setup norms.
pub fn summarize(events: &EventSet, before: &[f64], norms: &[BatchNorm]) -> Result<Vec<BatchSummary>, StageError> {
    if before.len() != events.len() {
        return Err(StageError::config(format!(
            "Expected {} pre-apply weight sums, got {}.",
            events.len(),
            before.len()
        )));
    }

    let mut out = Vec::with_capacity(events.len());
    for (batch, &before_sum) in events.batches().iter().zip(before) {
        let weights = batch.get(WEIGHTS)?;
        let norm = norms
            .iter()
            .find(|n| n.name == batch.name())
            .map(|n| n.norm)
            .ok_or_else(|| StageError::config(format!("No setup norm recorded for batch `{}`.", batch.name())))?;
        out.push(BatchSummary {
            name: batch.name().to_string(),
            n_events: batch.len(),
            norm,
            weight_sum_before: before_sum,
            weight_sum_after: weights.iter().sum(),
            n_zeroed: weights.iter().filter(|&&w| w == 0.0).count(),
        });
    }
    Ok(out)
}

/// Format the run summary: curve description, parameters and per-batch totals.
pub fn format_run_summary(
    curve: &InterpolatingCurve,
    source: &str,
    atm_muon_scale: f64,
    delta_gamma_mu: f64,
    summaries: &[BatchSummary],
) -> String {
    let mut out = String::new();

    out.push_str("=== mureweight - atmospheric muon systematic ===\n");
    out.push_str(&format!("Table: {source}\n"));
    out.push_str(&format!(
        "Curve: {} over {} nodes\n",
        curve.kind(),
        curve.nodes().x.len()
    ));
    out.push_str(&format!(
        "Params: atm_muon_scale={atm_muon_scale:.4} | delta_gamma_mu={delta_gamma_mu:.4}\n"
    ));

    out.push_str("\nBatches:\n");
    out.push_str(&format!(
        "{:<16} {:>8} {:>10} {:>14} {:>14} {:>8} {:>7}\n",
        "name", "events", "norm", "sum(w) before", "sum(w) after", "ratio", "zeroed"
    ));
    for s in summaries {
        let ratio = s.ratio().map(|r| format!("{r:.4}")).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<16} {:>8} {:>10.5} {:>14.4} {:>14.4} {:>8} {:>7}\n",
            s.name, s.n_events, s.norm, s.weight_sum_before, s.weight_sum_after, ratio, s.n_zeroed
        ));
    }

    out
}

/// Format a curve as `x y` rows over its nodes.
pub fn format_curve_nodes(curve: &InterpolatingCurve) -> String {
    let mut out = String::new();
    out.push_str(&format!("# kind: {}\n", curve.kind()));
    out.push_str("# x y\n");
    for (x, y) in curve.nodes().points() {
        out.push_str(&format!("{x:.6} {y:.6}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBatch;

    #[test]
    fn summary_counts_zeroed_events() {
        let mut batch = EventBatch::new("muons");
        batch.set(WEIGHTS, vec![0.0, 2.0, 3.0]).unwrap();
        let mut events = EventSet::new();
        events.push(batch);

        let norms = vec![BatchNorm {
            name: "muons".to_string(),
            n_events: 3,
            norm: 2.5,
        }];
        let s = summarize(&events, &[10.0], &norms).unwrap();
        assert_eq!(s[0].n_zeroed, 1);
        assert_eq!(s[0].weight_sum_after, 5.0);
        assert_eq!(s[0].ratio(), Some(0.5));
        assert_eq!(s[0].norm, 2.5);
    }

    #[test]
    fn summary_rejects_mismatched_inputs() {
        let mut batch = EventBatch::new("muons");
        batch.set(WEIGHTS, vec![1.0]).unwrap();
        let mut events = EventSet::new();
        events.push(batch);

        let norms = vec![BatchNorm {
            name: "muons".to_string(),
            n_events: 1,
            norm: 1.0,
        }];
        assert!(matches!(summarize(&events, &[], &norms), Err(StageError::Configuration(_))));
        assert!(matches!(summarize(&events, &[1.0], &[]), Err(StageError::Configuration(_))));
    }

    #[test]
    fn weight_sums_follow_batch_order() {
        let mut events = EventSet::new();
        for (name, w) in [("a", vec![1.0, 1.0]), ("b", vec![0.5])] {
            let mut batch = EventBatch::new(name);
            batch.set(WEIGHTS, w).unwrap();
            events.push(batch);
        }
        assert_eq!(weight_sums(&events).unwrap(), vec![2.0, 0.5]);
    }
}
