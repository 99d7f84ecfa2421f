//! Request-level operations over extracted series.
//!
//! - `predict`: fit per grade and estimate the target and previous month
//! - `history`: the raw windowed points for charting (no fitting)

pub mod history;
pub mod predict;

pub use history::*;
pub use predict::*;
