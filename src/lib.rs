//! `mureweight` library crate.
//!
//! The binary (`mureweight`) is a thin wrapper around this library so that:
//!
//! - the curve builder and the reweighting stage are testable without spawning processes
//! - the stage can be embedded in a larger event-processing pipeline

pub mod app;
pub mod cli;
pub mod curve;
pub mod domain;
pub mod error;
pub mod events;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod stage;
