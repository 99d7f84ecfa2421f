//! Debug bundle writer for inspecting extraction and curve fits.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::{FitStrategy, PredictionPolicy, SeriesMap};
use crate::error::AppError;
use crate::fit::fit;
use crate::io::ingest::Extraction;
use crate::report::summarize_series;

/// How many skipped keys are listed verbatim.
const MAX_SKIPPED_LISTED: usize = 20;

/// Context printed in the bundle header.
#[derive(Debug, Clone)]
pub struct DebugContext<'a> {
    pub source: &'a str,
    pub decoder: &'a str,
    pub policy: &'a PredictionPolicy,
}

/// Write `rice_debug_<timestamp>.md` under `dir` and return its path.
pub fn write_debug_bundle(dir: &Path, ctx: &DebugContext<'_>, extraction: &Extraction) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::Io(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("rice_debug_{ts}.md"));

    let mut file = File::create(&path).map_err(|e| AppError::Io(format!("Failed to create debug file: {e}")))?;
    file.write_all(render_debug_markdown(ctx, extraction).as_bytes())
        .map_err(|e| AppError::Io(format!("Failed to write debug file: {e}")))?;

    log::info!("wrote debug bundle to {}", path.display());
    Ok(path)
}

/// Bundle contents as Markdown.
pub fn render_debug_markdown(ctx: &DebugContext<'_>, extraction: &Extraction) -> String {
    let mut out = String::new();

    out.push_str("# rice debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("- source: {}\n", ctx.source));
    out.push_str(&format!("- decoder: {}\n", ctx.decoder));
    out.push_str(&format!(
        "- policy: cutoff={} | spline_before_year={} | degree={}\n",
        ctx.policy.cutoff, ctx.policy.historical_before_year, ctx.policy.degree
    ));

    out.push_str("\n## Extraction\n");
    out.push_str(&format!("- records_read: {}\n", extraction.records_read));
    out.push_str(&format!("- records_used: {}\n", extraction.records_used()));
    out.push_str(&format!("- duplicates_dropped: {}\n", extraction.duplicates_dropped));
    out.push_str(&format!("- skipped: {}\n", extraction.skipped.len()));

    if !extraction.skipped.is_empty() {
        out.push_str("\n| reason | count |\n| - | - |\n");
        for (label, count) in extraction.skip_counts() {
            out.push_str(&format!("| {label} | {count} |\n"));
        }

        out.push_str("\n### Skipped keys\n");
        for s in extraction.skipped.iter().take(MAX_SKIPPED_LISTED) {
            out.push_str(&format!("- `{}`: {}\n", s.key, s.reason));
        }
        if extraction.skipped.len() > MAX_SKIPPED_LISTED {
            out.push_str(&format!(
                "- ... {} more\n",
                extraction.skipped.len() - MAX_SKIPPED_LISTED
            ));
        }
    }

    out.push_str("\n## Series\n");
    out.push_str("| grade | n | first | last | min | max | last_price |\n");
    out.push_str("| - | - | - | - | - | - | - |\n");
    for s in summarize_series(&extraction.series) {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {:.2} | {:.2} | {:.2} |\n",
            s.grade,
            s.points,
            s.first.map(|m| m.to_string()).unwrap_or_default(),
            s.last.map(|m| m.to_string()).unwrap_or_default(),
            s.min_price,
            s.max_price,
            s.last_price
        ));
    }

    out.push_str(&format_fit_checks(&extraction.series, ctx.policy.degree));
    out
}

/// Evaluate both strategies at each grade's last observed point and one month later.
fn format_fit_checks(series: &SeriesMap, degree: usize) -> String {
    let strategies = [
        FitStrategy::NaturalCubicSpline,
        FitStrategy::PolynomialRegression { degree },
    ];

    let mut out = String::new();
    out.push_str("\n## Fit checks\n");
    out.push_str("| grade | strategy | t_last | observed | fit@last | fit@next |\n");
    out.push_str("| - | - | - | - | - | - |\n");

    for (grade, s) in series {
        let (Some(t_last), Some(&observed)) = (s.last_time(), s.prices().last()) else {
            continue;
        };
        let t_next = t_last + 1.0 / 12.0;

        for strategy in strategies {
            match fit(s, strategy) {
                Ok(curve) => out.push_str(&format!(
                    "| {grade} | {strategy} | {t_last:.4} | {observed:.2} | {:.2} | {:.2} |\n",
                    curve.evaluate(t_last),
                    curve.evaluate(t_next)
                )),
                Err(e) => out.push_str(&format!("| {grade} | {strategy} | {t_last:.4} | {observed:.2} | {e} | |\n")),
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PriceSource, SampleSource};
    use crate::domain::{QualityGrade, RawDataset, RawRecord, RawValue};
    use crate::io::decode::SuffixDecoder;
    use crate::io::ingest::extract_dataset;

    fn ctx(policy: &PredictionPolicy) -> DebugContext<'_> {
        DebugContext {
            source: "test",
            decoder: "suffix",
            policy,
        }
    }

    #[test]
    fn markdown_lists_skips_and_fit_checks() {
        let mut ds = SampleSource::default().fetch().unwrap();
        ds.records.push(RawRecord::new("950001231", RawValue::Number(1.0)));
        ds.records.push(RawRecord::new("150001231", RawValue::Text("n/a".to_string())));
        let extraction = extract_dataset(&ds, &SuffixDecoder).unwrap();

        let policy = PredictionPolicy::default();
        let md = render_debug_markdown(&ctx(&policy), &extraction);

        assert!(md.starts_with("# rice debug bundle\n"));
        assert!(md.contains("- skipped: 2\n"), "{md}");
        assert!(md.contains("- `950001231`: "));
        assert!(md.contains("| premium | 144 | 2013-01 | 2024-12 |"));
        assert!(md.contains("| low_quality | natural cubic spline | 2024.9167 |"));
        assert!(md.contains("| medium | polynomial regression (degree 3) |"));
    }

    #[test]
    fn short_series_reports_fit_error() {
        let ds = RawDataset {
            records: vec![
                RawRecord::new("150001231", RawValue::Number(10.0)),
                RawRecord::new("150001232", RawValue::Number(11.0)),
            ],
            years: crate::domain::YearLookup::new(vec![("123".to_string(), 2023)]),
            months: crate::domain::MonthLookup::calendar(),
        };
        let extraction = extract_dataset(&ds, &SuffixDecoder).unwrap();
        assert_eq!(extraction.series[&QualityGrade::Premium].len(), 2);

        let policy = PredictionPolicy::default();
        let md = render_debug_markdown(&ctx(&policy), &extraction);
        assert!(md.contains("need 4 points, got 2"), "{md}");
        assert!(md.contains("| premium | natural cubic spline | 2023.0833 | 11.00 | 11.00 | 12.00 |"), "{md}");
    }

    #[test]
    fn bundle_file_is_written() {
        let dir = std::env::temp_dir().join(format!("rice_debug_test_{}", std::process::id()));
        let ds = SampleSource::with_seed(3).fetch().unwrap();
        let extraction = extract_dataset(&ds, &SuffixDecoder).unwrap();

        let policy = PredictionPolicy::default();
        let path = write_debug_bundle(&dir, &ctx(&policy), &extraction).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert!(path.file_name().unwrap().to_string_lossy().starts_with("rice_debug_"));
        assert!(text.contains("## Fit checks"));
    }
}
