//! Payload ingest and normalization.
//!
//! This module turns a raw keyed BPS payload into one clean time series per
//! quality grade that is safe to fit.
//!
//! Design goals:
//! - **Record-level validation** (skip bad records, but report what happened)
//! - **Deterministic behavior** (payload order decides duplicates, nothing else)
//! - **Separation of concerns**: no fitting logic here

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{
    MonthLookup, QualityGrade, RawDataset, RawRecord, RawValue, Series, SeriesMap, YearLookup, YearMonth,
};
use crate::error::AppError;
use crate::io::decode::KeyDecoder;

/// Why a record did not make it into a series.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Leading key character is not a known grade code.
    UnknownGrade(char),
    /// Empty key.
    EmptyKey,
    /// No year/month could be decoded from the key.
    UndecodableDate,
    /// The value is not a finite number.
    InvalidPrice(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownGrade(c) => write!(f, "unknown grade code '{c}'"),
            SkipReason::EmptyKey => f.write_str("empty key"),
            SkipReason::UndecodableDate => f.write_str("no year/month code matches the key"),
            SkipReason::InvalidPrice(raw) => write!(f, "invalid price {raw}"),
        }
    }
}

impl SkipReason {
    /// Stable label used to group skip counts in reports.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::UnknownGrade(_) => "unknown_grade",
            SkipReason::EmptyKey => "empty_key",
            SkipReason::UndecodableDate => "undecodable_date",
            SkipReason::InvalidPrice(_) => "invalid_price",
        }
    }
}

/// A record that decoded cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub grade: QualityGrade,
    pub month: YearMonth,
    pub time: f64,
    pub price: f64,
}

/// A record that was dropped, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub key: String,
    pub reason: SkipReason,
}

/// Extractor output: cleaned series plus record-level accounting.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub series: SeriesMap,
    pub skipped: Vec<SkippedRecord>,
    pub records_read: usize,
    /// Records that decoded cleanly but repeated an earlier time point.
    pub duplicates_dropped: usize,
}

impl Extraction {
    pub fn records_used(&self) -> usize {
        self.series.values().map(Series::len).sum()
    }

    /// Skip counts grouped by reason label, in label order.
    pub fn skip_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for s in &self.skipped {
            *counts.entry(s.reason.label()).or_insert(0) += 1;
        }
        counts
    }
}

/// Extract series from a fetched dataset.
pub fn extract_dataset(dataset: &RawDataset, decoder: &dyn KeyDecoder) -> Result<Extraction, AppError> {
    extract_series(&dataset.records, &dataset.years, &dataset.months, decoder)
}

/// Extract one strictly increasing series per grade.
///
/// - decodes each record independently (bad records are skipped and recorded)
/// - stable-sorts each grade by time point
/// - drops repeated time points, keeping the first record in payload order
/// - omits grades with no usable records
pub fn extract_series(
    records: &[RawRecord],
    years: &YearLookup,
    months: &MonthLookup,
    decoder: &dyn KeyDecoder,
) -> Result<Extraction, AppError> {
    if records.is_empty() {
        return Err(AppError::MissingData);
    }

    let mut buffers: BTreeMap<QualityGrade, Vec<(f64, f64)>> = BTreeMap::new();
    let mut skipped = Vec::new();

    for record in records {
        match parse_record(record, years, months, decoder) {
            Ok(parsed) => buffers
                .entry(parsed.grade)
                .or_default()
                .push((parsed.time, parsed.price)),
            Err(reason) => {
                log::debug!("skipping record '{}': {reason}", record.key);
                skipped.push(SkippedRecord {
                    key: record.key.clone(),
                    reason,
                });
            }
        }
    }

    let mut series = SeriesMap::new();
    let mut duplicates_dropped = 0usize;

    for (grade, mut points) in buffers {
        // `sort_by` is stable, so equal time points keep payload order.
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let before = points.len();
        points.dedup_by(|later, kept| later.0 == kept.0);
        duplicates_dropped += before - points.len();

        let (times, prices): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
        let s = Series::new(times, prices).ok_or(AppError::DataIntegrity { grade })?;
        series.insert(grade, s);
    }

    if series.is_empty() {
        return Err(AppError::NoValidData);
    }

    log::info!(
        "extracted {} grade(s) from {} record(s) using the {} decoder ({} skipped, {} duplicate(s))",
        series.len(),
        records.len(),
        decoder.name(),
        skipped.len(),
        duplicates_dropped
    );

    Ok(Extraction {
        series,
        skipped,
        records_read: records.len(),
        duplicates_dropped,
    })
}

/// Decode a single record.
pub fn parse_record(
    record: &RawRecord,
    years: &YearLookup,
    months: &MonthLookup,
    decoder: &dyn KeyDecoder,
) -> Result<ParsedRecord, SkipReason> {
    let code = record.key.chars().next().ok_or(SkipReason::EmptyKey)?;
    let grade = QualityGrade::from_code(code).ok_or(SkipReason::UnknownGrade(code))?;

    let month = decoder
        .decode(&record.key, years, months)
        .ok_or(SkipReason::UndecodableDate)?;

    let price = parse_price(&record.value).ok_or_else(|| SkipReason::InvalidPrice(describe(&record.value)))?;

    Ok(ParsedRecord {
        grade,
        month,
        time: month.time_point(),
        price,
    })
}

fn parse_price(value: &RawValue) -> Option<f64> {
    let v = match value {
        RawValue::Number(v) => *v,
        RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        RawValue::Other(_) => return None,
    };
    if v.is_finite() { Some(v) } else { None }
}

fn describe(value: &RawValue) -> String {
    match value {
        RawValue::Number(v) => v.to_string(),
        RawValue::Text(s) => format!("'{s}'"),
        RawValue::Other(v) => v.to_string(),
    }
}
