//! `rice-curves` library crate.
//!
//! The binary (`rice`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes or calling the API
//! - modules are reusable (e.g., an HTTP service in front of `predict`)
//! - code stays easy to navigate as the project grows
//!
//! Data flow: a [`data::PriceSource`] yields a raw keyed payload,
//! [`io::ingest`] turns it into one [`domain::Series`] per quality grade,
//! [`forecast`] fits curves and answers prediction and history queries.

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod fit;
pub mod forecast;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
