//! Windowed raw history for charting.
//!
//! Points are returned exactly as extracted; no curve is fitted. The calendar
//! month is recovered from each time point's fractional year.

use crate::domain::{History, HistoricalPoint, HistoryWindow, SeriesMap, YearMonth};

/// Raw points per grade inside `window` (inclusive on both ends).
///
/// Grades with no points in the window are left out.
pub fn history(series: &SeriesMap, window: &HistoryWindow) -> History {
    let mut out = History::new();
    for (&grade, s) in series {
        let mut points = Vec::new();
        for (t, price) in s.points() {
            let Some(ym) = YearMonth::from_time_point(t) else {
                log::warn!("{grade}: time point {t} does not map to a calendar month; skipped");
                continue;
            };
            if window.contains(ym) {
                points.push(HistoricalPoint {
                    year: ym.year,
                    month: ym.month,
                    price,
                });
            }
        }
        if !points.is_empty() {
            out.insert(grade, points);
        }
    }
    out
}
