//! Price data sources.
//!
//! - `bps`: BPS WebAPI (variable 500, monthly rice prices by quality)
//! - `sample`: seeded synthetic payload with the same key layout, for offline use

pub mod bps;
pub mod sample;

pub use bps::*;
pub use sample::*;

use crate::domain::RawDataset;
use crate::error::AppError;

/// Something that can produce one raw payload per call.
///
/// Implementations do their own I/O; everything downstream is pure.
pub trait PriceSource {
    /// Short description for logs and reports.
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<RawDataset, AppError>;
}
