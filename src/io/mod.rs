//! Input/output helpers.
//!
//! - payload key decoding (`decode`)
//! - payload -> per-grade series extraction (`ingest`)
//! - result exports (CSV/JSON) (`export`)

pub mod decode;
pub mod export;
pub mod ingest;

pub use decode::*;
pub use export::*;
pub use ingest::*;
