//! Event data: per-species batches of named per-event arrays, and a toy
//! generator to fill them.

pub mod batch;
pub mod generator;

pub use batch::*;
pub use generator::*;
