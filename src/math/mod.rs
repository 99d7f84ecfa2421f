//! Numerical primitives: least squares and tridiagonal solves.

pub mod ols;
pub mod tridiagonal;

pub use ols::*;
pub use tridiagonal::*;
