//! Mathematical utilities: piecewise interpolation and cubic splines.

pub mod interp;
pub mod spline;

pub use interp::*;
pub use spline::*;
