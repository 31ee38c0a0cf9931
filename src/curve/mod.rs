//! Spectral-index uncertainty curve.
//!
//! Responsibilities:
//!
//! - validate the configured variable and calibration file name
//! - load, repair and pad the calibration table
//! - fit an immutable 1-D interpolating curve over `[0, 1]`

pub mod builder;
pub mod interpolating;

pub use builder::*;
pub use interpolating::*;
