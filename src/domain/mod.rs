//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - quality grades and calendar months (`QualityGrade`, `YearMonth`)
//! - raw payload records and code lookups (`RawRecord`, `YearLookup`, `MonthLookup`)
//! - cleaned series and fit strategies (`Series`, `FitStrategy`)
//! - request outputs (`PredictionResult`, `HistoricalPoint`)

pub mod types;

pub use types::*;
