//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - build a `FittedCurve` for a series under one strategy (`fitter`)
//! - choose strategies for a prediction request from the calendar (`selection`)

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;
