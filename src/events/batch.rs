//! Per-species event containers.

use std::collections::BTreeMap;

use crate::error::StageError;

/// Key of the per-event weight array.
pub const WEIGHTS: &str = "weights";
/// Key of the weights the toy generator resets `weights` to.
pub const INITIAL_WEIGHTS: &str = "initial_weights";
/// Raw curve value per event.
pub const RW_ARRAY: &str = "rw_array";
/// Curve value per event minus the batch mean.
pub const CR_RW_ARRAY: &str = "cr_rw_array";

/// Named `f64` arrays sharing one event count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventBatch {
    name: String,
    size: Option<usize>,
    arrays: BTreeMap<String, Vec<f64>>,
}

impl EventBatch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            arrays: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of events (0 until the first array is stored).
    pub fn len(&self) -> usize {
        self.size.unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.arrays.contains_key(key)
    }

    /// Store (or replace) an array. Its length must match the batch size.
    pub fn set(&mut self, key: impl Into<String>, values: Vec<f64>) -> Result<(), StageError> {
        let key = key.into();
        match self.size {
            Some(n) if n != values.len() => {
                return Err(StageError::config(format!(
                    "Array `{key}` has {} entries but batch `{}` holds {n} events.",
                    values.len(),
                    self.name
                )));
            }
            Some(_) => {}
            None => self.size = Some(values.len()),
        }
        self.arrays.insert(key, values);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<&[f64], StageError> {
        self.arrays
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| self.missing(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut [f64], StageError> {
        match self.arrays.get_mut(key) {
            Some(values) => Ok(values.as_mut_slice()),
            None => Err(StageError::config(format!(
                "Batch `{}` has no array `{key}`.",
                self.name
            ))),
        }
    }

    /// Mutable access to `target` alongside shared access to `source`.
    pub fn get_pair_mut(&mut self, target: &str, source: &str) -> Result<(&mut [f64], &[f64]), StageError> {
        if target == source {
            return Err(StageError::config(format!(
                "Cannot borrow array `{target}` mutably and immutably at once."
            )));
        }
        if !self.arrays.contains_key(source) {
            return Err(self.missing(source));
        }
        if !self.arrays.contains_key(target) {
            return Err(self.missing(target));
        }

        let mut target_slice = None;
        let mut source_slice = None;
        for (key, values) in self.arrays.iter_mut() {
            if key == target {
                target_slice = Some(values.as_mut_slice());
            } else if key == source {
                source_slice = Some(values.as_slice());
            }
        }
        match (target_slice, source_slice) {
            (Some(t), Some(s)) => Ok((t, s)),
            _ => Err(StageError::config(format!(
                "Batch `{}` is missing `{target}` or `{source}`.",
                self.name
            ))),
        }
    }

    fn missing(&self, key: &str) -> StageError {
        StageError::config(format!("Batch `{}` has no array `{key}`.", self.name))
    }
}

/// An ordered collection of event batches (one per species).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventSet {
    batches: Vec<EventBatch>,
}

impl EventSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, batch: EventBatch) {
        self.batches.push(batch);
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn batches(&self) -> &[EventBatch] {
        &self.batches
    }

    pub fn batches_mut(&mut self) -> &mut [EventBatch] {
        &mut self.batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_must_share_length() {
        let mut batch = EventBatch::new("muons");
        batch.set("true_coszen", vec![0.1, 0.2]).unwrap();
        assert_eq!(batch.len(), 2);
        let err = batch.set(WEIGHTS, vec![1.0]).unwrap_err();
        assert!(matches!(err, StageError::Configuration(_)));
    }

    #[test]
    fn missing_array_is_configuration_error() {
        let batch = EventBatch::new("muons");
        assert!(matches!(batch.get("true_coszen"), Err(StageError::Configuration(_))));
    }

    #[test]
    fn pair_borrow_gives_both_arrays() {
        let mut batch = EventBatch::new("muons");
        batch.set(WEIGHTS, vec![1.0, 2.0]).unwrap();
        batch.set(CR_RW_ARRAY, vec![0.5, -0.5]).unwrap();

        let (weights, term) = batch.get_pair_mut(WEIGHTS, CR_RW_ARRAY).unwrap();
        for (w, t) in weights.iter_mut().zip(term) {
            *w += t;
        }
        assert_eq!(batch.get(WEIGHTS).unwrap(), &[1.5, 1.5]);
    }
}
