//! Shared pipeline logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> extract -> (predict | history)
//!
//! The CLI handlers can then focus on presentation (printing vs exports).

use crate::data::PriceSource;
use crate::domain::{History, HistoryWindow, PredictionPolicy, PredictionResult, YearMonth};
use crate::error::AppError;
use crate::forecast::{history, predict};
use crate::io::decode::KeyDecoder;
use crate::io::ingest::{Extraction, extract_dataset};

/// Outputs of a prediction request.
#[derive(Debug, Clone)]
pub struct PredictRun {
    pub source: String,
    pub extraction: Extraction,
    pub result: PredictionResult,
}

/// Outputs of a history request.
#[derive(Debug, Clone)]
pub struct HistoryRun {
    pub source: String,
    pub extraction: Extraction,
    pub history: History,
}

/// Fetch one payload and extract its series.
pub fn load_series(source: &dyn PriceSource, decoder: &dyn KeyDecoder) -> Result<Extraction, AppError> {
    let dataset = source.fetch()?;
    extract_dataset(&dataset, decoder)
}

/// Predict `target` from freshly fetched data.
///
/// The target is validated before anything is fetched.
pub fn run_predict(
    source: &dyn PriceSource,
    decoder: &dyn KeyDecoder,
    target: YearMonth,
    policy: &PredictionPolicy,
) -> Result<PredictRun, AppError> {
    crate::fit::validate_target(target, policy)?;

    let extraction = load_series(source, decoder)?;
    let result = predict(&extraction.series, target, policy)?;

    Ok(PredictRun {
        source: source.describe(),
        extraction,
        result,
    })
}

/// Raw windowed history from freshly fetched data.
pub fn run_history(
    source: &dyn PriceSource,
    decoder: &dyn KeyDecoder,
    window: &HistoryWindow,
) -> Result<HistoryRun, AppError> {
    if window.end < window.start {
        return Err(AppError::Validation(format!(
            "History window ends ({}) before it starts ({}).",
            window.end, window.start
        )));
    }

    let extraction = load_series(source, decoder)?;
    let history = history(&extraction.series, window);

    Ok(HistoryRun {
        source: source.describe(),
        extraction,
        history,
    })
}
