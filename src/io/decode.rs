//! Year/month decoding for composite BPS data keys.
//!
//! A key such as `150001131` packs a grade digit, variable codes, a year code
//! and a month code into one string. Two layouts have been seen in the wild:
//!
//! - **suffix**: the key ends with `{year_code}{month_code}` where both codes
//!   come from the payload's own `tahun`/`turtahun` tables
//!   (`1 5000 113 1` = premium, 2013, January)
//! - **offset**: three-digit year code (years since 1900) at `[5..8]`, month
//!   code from `8..` (`3 5000 123 12` = low quality, 2023, December)
//!
//! The layout is injected into the extractor as a `KeyDecoder`.

use std::ops::Range;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::{MonthLookup, YearLookup, YearMonth};

/// Decodes the calendar month encoded in a data key.
pub trait KeyDecoder {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Decode `(year, month)` from `key`, or `None` if the key does not match.
    fn decode(&self, key: &str, years: &YearLookup, months: &MonthLookup) -> Option<YearMonth>;
}

/// Match `{year_code}{month_code}` against the end of the key.
///
/// Candidate pairs are tried in lookup order (years outer, months inner) and
/// the first hit wins. If one code is a suffix of another (month `1` vs `11`),
/// the answer depends on that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixDecoder;

impl KeyDecoder for SuffixDecoder {
    fn name(&self) -> &'static str {
        "suffix"
    }

    fn decode(&self, key: &str, years: &YearLookup, months: &MonthLookup) -> Option<YearMonth> {
        for (year_code, year) in years.entries() {
            for (month_code, month) in months.entries() {
                let hit = key
                    .strip_suffix(month_code.as_str())
                    .is_some_and(|rest| rest.ends_with(year_code.as_str()));
                if hit {
                    return Some(YearMonth::new(*year, *month));
                }
            }
        }
        None
    }
}

/// Slice the year and month codes at fixed digit offsets.
///
/// The year code counts years since 1900, as in the BPS `tahun` table.
#[derive(Debug, Clone)]
pub struct OffsetDecoder {
    pub year: Range<usize>,
    pub month_start: usize,
    pub min_len: usize,
}

impl Default for OffsetDecoder {
    fn default() -> Self {
        Self {
            year: 5..8,
            month_start: 8,
            min_len: 9,
        }
    }
}

impl KeyDecoder for OffsetDecoder {
    fn name(&self) -> &'static str {
        "offset"
    }

    fn decode(&self, key: &str, _years: &YearLookup, _months: &MonthLookup) -> Option<YearMonth> {
        if key.len() < self.min_len || !key.is_ascii() {
            return None;
        }
        let year_code: i32 = key.get(self.year.clone())?.parse().ok()?;
        let month: u32 = key.get(self.month_start..)?.parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(YearMonth::new(1900 + year_code, month))
    }
}

/// Decoder selection (CLI `--decoder`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecoderKind {
    #[default]
    Suffix,
    Offset,
}

impl DecoderKind {
    pub fn decoder(self) -> Box<dyn KeyDecoder> {
        match self {
            DecoderKind::Suffix => Box::new(SuffixDecoder),
            DecoderKind::Offset => Box::new(OffsetDecoder::default()),
        }
    }
}
