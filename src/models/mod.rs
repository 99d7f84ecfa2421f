//! Curve model implementations.
//!
//! Each model is a small immutable value built once from a cleaned series and
//! evaluated at arbitrary time points. Fitting policy (which model, minimum
//! sizes, error mapping) lives in `fit`.

pub mod polynomial;
pub mod spline;

pub use polynomial::*;
pub use spline::*;
