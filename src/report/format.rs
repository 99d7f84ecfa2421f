//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{GradePrediction, History, PredictionPolicy, PredictionResult, YearMonth};
use crate::fit::select_strategies;
use crate::io::ingest::Extraction;
use crate::report::summarize_series;

/// Header block: where the data came from and what extraction kept.
pub fn format_run_summary(source: &str, extraction: &Extraction) -> String {
    let mut out = String::new();

    out.push_str("=== rice - Rice Price Curves (BPS) ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Records: read={} | used={} | skipped={} | duplicates={}\n",
        extraction.records_read,
        extraction.records_used(),
        extraction.skipped.len(),
        extraction.duplicates_dropped
    ));
    for (label, count) in extraction.skip_counts() {
        out.push_str(&format!("  (skipped {count}) {label}\n"));
    }

    out.push_str("\nSeries:\n");
    for s in summarize_series(&extraction.series) {
        out.push_str(&format!(
            "- {:<12} n={:<4} {}..{} | price=[{:.0}, {:.0}] | last={:.0}\n",
            s.grade.display_name(),
            s.points,
            fmt_month(s.first),
            fmt_month(s.last),
            s.min_price,
            s.max_price,
            s.last_price
        ));
    }
    out.push('\n');

    out
}

/// Per-grade estimates for one request.
pub fn format_prediction(result: &PredictionResult, policy: &PredictionPolicy) -> String {
    let target = YearMonth::new(result.year, result.month);
    let previous = target.previous();
    let choice = select_strategies(target, policy);

    let mut out = String::new();
    out.push_str(&format!("Prediction for {target}:\n"));
    out.push_str(&format!("- {target}: {}\n", choice.target));
    out.push_str(&format!("- {previous}: {}\n", choice.previous));
    out.push('\n');

    let target_col = target.to_string();
    let previous_col = previous.to_string();
    out.push_str(
        format!(
            "{:<12} {:>12} {:>12} {:>10}\n",
            "grade", target_col, previous_col, "change"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<12} {:-<12} {:-<10}", "", "", "", "").trim_end());
    out.push('\n');

    for (grade, p) in &result.predictions {
        let line = match p {
            GradePrediction::Estimate {
                estimated_price,
                previous_price,
            } => format!(
                "{:<12} {:>12.2} {:>12.2} {:>10}",
                grade.display_name(),
                estimated_price,
                previous_price,
                fmt_change(*estimated_price, *previous_price)
            ),
            GradePrediction::Error { error } => format!("{:<12} {error}", grade.display_name()),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

/// Month-by-grade price table for the history read path.
///
/// One row per month that any grade has; missing cells are left blank.
pub fn format_history_table(history: &History) -> String {
    let grades: Vec<_> = history.keys().copied().collect();

    let mut months: Vec<YearMonth> = history
        .values()
        .flat_map(|points| points.iter().map(|p| YearMonth::new(p.year, p.month)))
        .collect();
    months.sort();
    months.dedup();

    let mut out = String::new();
    let mut header = format!("{:<8}", "month");
    let mut rule = format!("{:-<8}", "");
    for g in &grades {
        header.push_str(&format!(" {:>12}", g.display_name()));
        rule.push_str(&format!(" {:-<12}", ""));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(rule.trim_end());
    out.push('\n');

    for ym in months {
        let mut row = format!("{:<8}", ym.to_string());
        for g in &grades {
            let cell = history[g]
                .iter()
                .find(|p| p.year == ym.year && p.month == ym.month)
                .map(|p| format!("{:.0}", p.price))
                .unwrap_or_default();
            row.push_str(&format!(" {cell:>12}"));
        }
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out
}

fn fmt_month(ym: Option<YearMonth>) -> String {
    ym.map(|m| m.to_string()).unwrap_or_else(|| "?".to_string())
}

fn fmt_change(current: f64, previous: f64) -> String {
    if previous == 0.0 {
        return "n/a".to_string();
    }
    format!("{:+.2}%", (current - previous) / previous * 100.0)
}
