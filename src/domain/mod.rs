//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the independent-variable naming convention (`VariableSpec`)
//! - interpolation kinds (`SplineKind`)
//! - calibration tables before and after padding
//! - the stage parameter store (`ParamSet`)
//! - the portable curve file schema (`CurveFile`)

pub mod params;
pub mod types;

pub use params::*;
pub use types::*;
