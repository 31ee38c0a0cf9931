//! Pipeline stages.
//!
//! - `atm_muons`: atmospheric muon spectral-index and normalization systematic

pub mod atm_muons;

pub use atm_muons::*;
