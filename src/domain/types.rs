//! Shared domain types.
//!
//! These types are intentionally kept small and serializable so they can be:
//!
//! - built by the fetch collaborators (`data::bps`, `data::sample`)
//! - cleaned by the extractor (`io::ingest`)
//! - fitted and evaluated (`fit`, `forecast`)
//! - printed or exported as JSON/CSV

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Rice price quality grade, one independent series each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityGrade {
    Premium,
    Medium,
    LowQuality,
}

impl QualityGrade {
    pub const ALL: [QualityGrade; 3] = [
        QualityGrade::Premium,
        QualityGrade::Medium,
        QualityGrade::LowQuality,
    ];

    /// Grade for the leading digit of a BPS data key.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '1' => Some(QualityGrade::Premium),
            '2' => Some(QualityGrade::Medium),
            '3' => Some(QualityGrade::LowQuality),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            QualityGrade::Premium => '1',
            QualityGrade::Medium => '2',
            QualityGrade::LowQuality => '3',
        }
    }

    /// Machine name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            QualityGrade::Premium => "premium",
            QualityGrade::Medium => "medium",
            QualityGrade::LowQuality => "low_quality",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            QualityGrade::Premium => "Premium",
            QualityGrade::Medium => "Medium",
            QualityGrade::LowQuality => "Low quality",
        }
    }

    /// Single-character marker used by the ASCII chart.
    pub fn marker(self) -> char {
        match self {
            QualityGrade::Premium => 'P',
            QualityGrade::Medium => 'M',
            QualityGrade::LowQuality => 'L',
        }
    }
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Continuous year-fraction for a calendar month.
///
/// March 2024 is `2024 + 2/12`. Every x-axis value in the crate goes through
/// this function so extracted points and query points compare exactly.
pub fn time_point(year: i32, month: u32) -> f64 {
    year as f64 + (month as f64 - 1.0) / 12.0
}

/// A calendar `(year, month)` pair.
///
/// Field order matters: the derived `Ord` compares year first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    pub fn time_point(&self) -> f64 {
        time_point(self.year, self.month)
    }

    /// The month before, rolling January back to December of the previous year.
    pub fn previous(&self) -> Self {
        if self.month <= 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// Recover the calendar month from a time point.
    ///
    /// Returns `None` when the fractional part does not land on a month 1-12.
    pub fn from_time_point(t: f64) -> Option<Self> {
        if !t.is_finite() {
            return None;
        }
        let year = t.floor();
        let month = ((t - year) * 12.0).round() + 1.0;
        if !(1.0..=12.0).contains(&month) {
            return None;
        }
        Some(Self::new(year as i32, month as u32))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    /// Parse `YYYY-MM` (or `YYYY/MM`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        const FMTS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
        for fmt in FMTS {
            let sep = if fmt.contains('/') { '/' } else { '-' };
            if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}{sep}01"), fmt) {
                return Ok(Self::new(d.year(), d.month()));
            }
        }
        Err(format!("Invalid month '{s}'. Expected YYYY-MM."))
    }
}

/// A cleaned per-grade time series.
///
/// Invariants (checked by [`Series::new`]):
/// - `times` and `prices` have the same length
/// - `times` is strictly increasing
/// - every value is finite
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    times: Vec<f64>,
    prices: Vec<f64>,
}

impl Series {
    pub fn new(times: Vec<f64>, prices: Vec<f64>) -> Option<Self> {
        if times.len() != prices.len() {
            return None;
        }
        if !times.iter().chain(prices.iter()).all(|v| v.is_finite()) {
            return None;
        }
        if !times.windows(2).all(|w| w[1] > w[0]) {
            return None;
        }
        Some(Self { times, prices })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.prices.iter().copied())
    }

    pub fn first_time(&self) -> Option<f64> {
        self.times.first().copied()
    }

    pub fn last_time(&self) -> Option<f64> {
        self.times.last().copied()
    }
}

/// Extracted series, keyed by grade. Absent grade means "no data".
pub type SeriesMap = BTreeMap<QualityGrade, Series>;

/// A raw payload value as it appears in `datacontent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// One `datacontent` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub key: String,
    pub value: RawValue,
}

impl RawRecord {
    pub fn new(key: impl Into<String>, value: RawValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Ordered year-code table (`"113" -> 2013`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearLookup {
    entries: Vec<(String, i32)>,
}

impl YearLookup {
    pub fn new(entries: Vec<(String, i32)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, i32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered month-code table (`"1" -> 1`).
///
/// Only months 1-12 are admitted; the BPS annual entry and anything else out
/// of range never make it into the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthLookup {
    entries: Vec<(String, u32)>,
}

impl MonthLookup {
    pub fn new(entries: Vec<(String, u32)>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|(_, month)| (1..=12).contains(month))
            .collect();
        Self { entries }
    }

    /// Codes `"1"..="12"` mapping to themselves.
    pub fn calendar() -> Self {
        Self::new((1..=12).map(|m| (m.to_string(), m)).collect())
    }

    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One fetched payload, still in its raw keyed form.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub records: Vec<RawRecord>,
    pub years: YearLookup,
    pub months: MonthLookup,
}

/// Curve-fitting strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStrategy {
    /// Piecewise cubic through every point, zero curvature at both ends.
    NaturalCubicSpline,
    /// Least-squares polynomial of fixed degree over the whole series.
    PolynomialRegression { degree: usize },
}

impl FitStrategy {
    /// Minimum number of points the strategy can be fitted on.
    pub fn min_points(self) -> usize {
        match self {
            FitStrategy::NaturalCubicSpline => 2,
            FitStrategy::PolynomialRegression { degree } => degree.saturating_add(1),
        }
    }
}

impl fmt::Display for FitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitStrategy::NaturalCubicSpline => f.write_str("natural cubic spline"),
            FitStrategy::PolynomialRegression { degree } => {
                write!(f, "polynomial regression (degree {degree})")
            }
        }
    }
}

/// Strategies picked for one prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyChoice {
    pub target: FitStrategy,
    pub previous: FitStrategy,
}

/// Per-grade prediction output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GradePrediction {
    Estimate {
        estimated_price: f64,
        previous_price: f64,
    },
    Error {
        error: String,
    },
}

impl GradePrediction {
    pub fn is_error(&self) -> bool {
        matches!(self, GradePrediction::Error { .. })
    }
}

/// Result of one prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub year: i32,
    pub month: u32,
    pub predictions: BTreeMap<QualityGrade, GradePrediction>,
}

/// A raw observation as shown on the history chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub year: i32,
    pub month: u32,
    pub price: f64,
}

pub type History = BTreeMap<QualityGrade, Vec<HistoricalPoint>>;

/// Highest regression degree a prediction request may ask for.
pub const MAX_DEGREE: usize = 20;

/// Calendar rules for a prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionPolicy {
    /// Targets at or before this month are rejected.
    pub cutoff: YearMonth,
    /// Previous-month points in years before this one are treated as history
    /// and interpolated with the spline.
    pub historical_before_year: i32,
    /// Polynomial regression degree.
    pub degree: usize,
}

impl Default for PredictionPolicy {
    fn default() -> Self {
        Self {
            cutoff: YearMonth::new(2023, 12),
            historical_before_year: 2024,
            degree: 3,
        }
    }
}

/// Inclusive display window for the history read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    pub start: YearMonth,
    pub end: YearMonth,
}

impl HistoryWindow {
    pub fn contains(&self, ym: YearMonth) -> bool {
        self.start <= ym && ym <= self.end
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self {
            start: YearMonth::new(2013, 1),
            end: YearMonth::new(2024, 12),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_point_matches_year_fraction() {
        assert_eq!(time_point(2023, 12), 2023.0 + 11.0 / 12.0);
        assert_eq!(time_point(2024, 3), 2024.0 + 2.0 / 12.0);
        assert_eq!(YearMonth::new(2024, 1).time_point(), 2024.0);
    }

    #[test]
    fn previous_rolls_back_over_january() {
        assert_eq!(YearMonth::new(2025, 1).previous(), YearMonth::new(2024, 12));
        assert_eq!(YearMonth::new(2024, 6).previous(), YearMonth::new(2024, 5));
    }

    #[test]
    fn month_recovered_from_time_point() {
        for month in 1..=12 {
            let t = time_point(2020, month);
            assert_eq!(YearMonth::from_time_point(t), Some(YearMonth::new(2020, month)));
        }
        assert_eq!(
            YearMonth::from_time_point(2024.9166),
            Some(YearMonth::new(2024, 12))
        );
        assert_eq!(YearMonth::from_time_point(f64::NAN), None);
    }

    #[test]
    fn parse_year_month() {
        assert_eq!("2023-12".parse::<YearMonth>(), Ok(YearMonth::new(2023, 12)));
        assert_eq!("2024/02".parse::<YearMonth>(), Ok(YearMonth::new(2024, 2)));
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("june".parse::<YearMonth>().is_err());
        assert_eq!(YearMonth::new(2024, 6).to_string(), "2024-06");
    }

    #[test]
    fn series_rejects_broken_invariants() {
        assert!(Series::new(vec![1.0, 2.0], vec![1.0]).is_none());
        assert!(Series::new(vec![1.0, 1.0], vec![1.0, 2.0]).is_none());
        assert!(Series::new(vec![2.0, 1.0], vec![1.0, 2.0]).is_none());
        assert!(Series::new(vec![1.0, f64::NAN], vec![1.0, 2.0]).is_none());
        assert!(Series::new(vec![1.0, 2.0], vec![5.0, 6.0]).is_some());
    }

    #[test]
    fn month_lookup_drops_out_of_range_codes() {
        let months = MonthLookup::new(vec![
            ("1".to_string(), 1),
            ("12".to_string(), 12),
            ("13".to_string(), 13),
            ("0".to_string(), 0),
        ]);
        let codes: Vec<&str> = months.entries().iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, vec!["1", "12"]);
    }

    #[test]
    fn history_window_is_inclusive() {
        let w = HistoryWindow::default();
        assert!(w.contains(YearMonth::new(2013, 1)));
        assert!(w.contains(YearMonth::new(2024, 12)));
        assert!(!w.contains(YearMonth::new(2025, 1)));
        assert!(!w.contains(YearMonth::new(2012, 12)));
    }

    #[test]
    fn grade_prediction_serializes_flat() {
        let ok = GradePrediction::Estimate {
            estimated_price: 1.5,
            previous_price: 1.0,
        };
        let err = GradePrediction::Error {
            error: "Not enough data to interpolate".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&ok).unwrap(),
            r#"{"estimated_price":1.5,"previous_price":1.0}"#
        );
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            r#"{"error":"Not enough data to interpolate"}"#
        );
    }

    #[test]
    fn prediction_result_keys_use_grade_names() {
        let mut predictions = BTreeMap::new();
        predictions.insert(
            QualityGrade::LowQuality,
            GradePrediction::Error {
                error: "x".to_string(),
            },
        );
        let result = PredictionResult {
            year: 2024,
            month: 6,
            predictions,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"year":2024,"month":6,"predictions":{"low_quality":{"error":"x"}}}"#
        );
    }
}
