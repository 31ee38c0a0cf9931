//! Read/write curve JSON files.
//!
//! Curve JSON is the portable representation of a built curve:
//! - interpolation kind and padded nodes
//! - source table identifier and variable
//! - a precomputed grid for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::curve::InterpolatingCurve;
use crate::domain::{CurveFile, CurveGrid, VariableSpec};
use crate::error::StageError;

/// Number of grid samples stored alongside the nodes.
pub const GRID_POINTS: usize = 101;

/// Describe a built curve as a `CurveFile`.
pub fn curve_file(curve: &InterpolatingCurve, source: &str, variable: &VariableSpec) -> Result<CurveFile, StageError> {
    let (x, y) = curve.sample_grid(GRID_POINTS)?;
    Ok(CurveFile {
        tool: "mureweight".to_string(),
        generated_at: Utc::now(),
        source: source.to_string(),
        variable: variable.clone(),
        kind: curve.kind(),
        nodes: curve.nodes().clone(),
        grid: CurveGrid { x, y },
    })
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, curve: &CurveFile) -> Result<(), StageError> {
    let file = File::create(path)
        .map_err(|e| StageError::io(format!("Failed to create curve JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, curve)
        .map_err(|e| StageError::io(format!("Failed to write curve JSON: {e}")))?;
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, StageError> {
    let file = File::open(path)
        .map_err(|e| StageError::resource(format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile = serde_json::from_reader(file)
        .map_err(|e| StageError::resource(format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

/// Rebuild the interpolating curve from a saved file's nodes.
pub fn curve_from_file(file: &CurveFile) -> Result<InterpolatingCurve, StageError> {
    InterpolatingCurve::new(file.nodes.clone(), file.kind)
}
