//! Input/output helpers.
//!
//! - calibration resource lookup (`resource`)
//! - calibration table parsing (`table`)
//! - per-event CSV exports (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod resource;
pub mod table;

pub use curve::*;
pub use export::*;
pub use resource::*;
pub use table::*;
