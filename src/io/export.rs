//! Export per-event results to CSV.
//!
//! One row per event across all batches, easy to load in spreadsheets or
//! downstream scripts.

use std::path::Path;

use serde::Serialize;

use crate::domain::VariableSpec;
use crate::error::StageError;
use crate::events::{CR_RW_ARRAY, EventSet, RW_ARRAY, WEIGHTS};

#[derive(Debug, Serialize)]
struct EventRow<'a> {
    batch: &'a str,
    index: usize,
    variable: f64,
    rw_array: f64,
    cr_rw_array: f64,
    weight: f64,
}

/// Write `(batch, index, variable, rw_array, cr_rw_array, weight)` rows.
pub fn write_events_csv(path: &Path, events: &EventSet, variable: &VariableSpec) -> Result<(), StageError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| StageError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for batch in events.batches() {
        let values = batch.get(&variable.raw_name)?;
        let rw = batch.get(RW_ARRAY)?;
        let cr_rw = batch.get(CR_RW_ARRAY)?;
        let weights = batch.get(WEIGHTS)?;

        for i in 0..batch.len() {
            writer
                .serialize(EventRow {
                    batch: batch.name(),
                    index: i,
                    variable: values[i],
                    rw_array: rw[i],
                    cr_rw_array: cr_rw[i],
                    weight: weights[i],
                })
                .map_err(|e| StageError::io(format!("Failed to write export CSV row: {e}")))?;
        }
    }

    writer
        .flush()
        .map_err(|e| StageError::io(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
