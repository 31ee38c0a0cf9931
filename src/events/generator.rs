//! Toy event generator.
//!
//! Fills one batch per output name with random truth variables and initial
//! weights. Reproducible for a given seed: a single `StdRng` is drawn from in
//! batch order.

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};

use crate::error::StageError;
use crate::events::{EventBatch, EventSet, INITIAL_WEIGHTS, WEIGHTS};

/// Decades of true energy spanned by the generator (1 GeV to 1 TeV).
const ENERGY_DECADES: f64 = 3.0;

#[derive(Debug, Clone)]
pub struct ToyConfig {
    pub names: Vec<String>,
    pub n_events: usize,
    /// Draw initial weights uniformly in `[0, 1)` instead of using ones.
    pub random_weights: bool,
    pub seed: u64,
    pub coszen_min: f64,
    pub coszen_max: f64,
}

impl Default for ToyConfig {
    fn default() -> Self {
        Self {
            names: vec!["muons".to_string()],
            n_events: 1000,
            random_weights: false,
            seed: 42,
            coszen_min: 0.0,
            coszen_max: 1.0,
        }
    }
}

/// Generate `n_events` per name with `true_energy`, `true_coszen`,
/// `initial_weights` and `weights`.
pub fn generate_events(config: &ToyConfig) -> Result<EventSet, StageError> {
    if config.names.is_empty() {
        return Err(StageError::config("At least one output name is required."));
    }
    if config.n_events == 0 {
        return Err(StageError::config("Event count must be > 0."));
    }
    if !(config.coszen_min.is_finite()
        && config.coszen_max.is_finite()
        && config.coszen_min < config.coszen_max
        && config.coszen_min >= -1.0
        && config.coszen_max <= 1.0)
    {
        return Err(StageError::config(format!(
            "Invalid coszen range [{}, {}]; expected -1 <= min < max <= 1.",
            config.coszen_min, config.coszen_max
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let unit = Uniform::new(0.0_f64, 1.0);
    let coszen = Uniform::new_inclusive(config.coszen_min, config.coszen_max);

    let mut events = EventSet::new();
    for name in &config.names {
        let n = config.n_events;
        let energy: Vec<f64> = (0..n)
            .map(|_| 10f64.powf(unit.sample(&mut rng) * ENERGY_DECADES))
            .collect();
        let cz: Vec<f64> = (0..n).map(|_| coszen.sample(&mut rng)).collect();
        let initial = if config.random_weights {
            (0..n).map(|_| unit.sample(&mut rng)).collect()
        } else {
            vec![1.0; n]
        };

        let mut batch = EventBatch::new(name.clone());
        batch.set("true_energy", energy)?;
        batch.set("true_coszen", cz)?;
        batch.set(WEIGHTS, initial.clone())?;
        batch.set(INITIAL_WEIGHTS, initial)?;
        events.push(batch);
    }

    info!(
        "generated {} toy batch(es) of {} events (seed {})",
        events.len(),
        config.n_events,
        config.seed
    );
    Ok(events)
}

/// Reset every batch's `weights` to its `initial_weights`.
pub fn reset_weights(events: &mut EventSet) -> Result<(), StageError> {
    for batch in events.batches_mut() {
        let initial = batch.get(INITIAL_WEIGHTS)?.to_vec();
        batch.set(WEIGHTS, initial)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_events() {
        let config = ToyConfig {
            names: vec!["muons".to_string(), "muons_bkg".to_string()],
            n_events: 50,
            random_weights: true,
            ..ToyConfig::default()
        };
        let a = generate_events(&config).unwrap();
        let b = generate_events(&config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn values_respect_ranges() {
        let config = ToyConfig {
            n_events: 200,
            coszen_min: 0.2,
            coszen_max: 0.7,
            random_weights: true,
            ..ToyConfig::default()
        };
        let events = generate_events(&config).unwrap();
        let batch = &events.batches()[0];
        assert!(batch.get("true_coszen").unwrap().iter().all(|&c| (0.2..=0.7).contains(&c)));
        assert!(batch.get("true_energy").unwrap().iter().all(|&e| (1.0..=1000.0).contains(&e)));
        assert!(batch.get(INITIAL_WEIGHTS).unwrap().iter().all(|&w| (0.0..1.0).contains(&w)));
    }

    #[test]
    fn reset_restores_initial_weights() {
        let mut events = generate_events(&ToyConfig::default()).unwrap();
        for w in events.batches_mut()[0].get_mut(WEIGHTS).unwrap() {
            *w *= 3.0;
        }
        reset_weights(&mut events).unwrap();
        let batch = &events.batches()[0];
        assert_eq!(batch.get(WEIGHTS).unwrap(), batch.get(INITIAL_WEIGHTS).unwrap());
    }

    #[test]
    fn invalid_range_is_rejected() {
        let config = ToyConfig {
            coszen_min: 0.5,
            coszen_max: 0.5,
            ..ToyConfig::default()
        };
        assert!(matches!(generate_events(&config), Err(StageError::Configuration(_))));
    }
}
