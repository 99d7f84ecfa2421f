//! Reporting utilities: per-grade summaries and formatted terminal output.

use crate::domain::{QualityGrade, SeriesMap, YearMonth};

pub mod format;

pub use format::*;

/// Shape of one extracted series, for summaries and the debug bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeSummary {
    pub grade: QualityGrade,
    pub points: usize,
    pub first: Option<YearMonth>,
    pub last: Option<YearMonth>,
    pub min_price: f64,
    pub max_price: f64,
    pub last_price: f64,
}

/// Summarize every extracted series, in grade order.
pub fn summarize_series(series: &SeriesMap) -> Vec<GradeSummary> {
    let mut out = Vec::with_capacity(series.len());
    for (&grade, s) in series {
        let prices = s.prices();
        let (Some(&last_price), Some(first_t), Some(last_t)) = (prices.last(), s.first_time(), s.last_time())
        else {
            continue;
        };
        let min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        out.push(GradeSummary {
            grade,
            points: s.len(),
            first: YearMonth::from_time_point(first_t),
            last: YearMonth::from_time_point(last_t),
            min_price,
            max_price,
            last_price,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Series, time_point};

    #[test]
    fn summarize_basic() {
        let mut map = SeriesMap::new();
        map.insert(
            QualityGrade::Medium,
            Series::new(
                vec![time_point(2019, 11), time_point(2019, 12), time_point(2020, 1)],
                vec![10_500.0, 10_200.0, 10_350.0],
            )
            .unwrap(),
        );

        let s = summarize_series(&map);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].grade, QualityGrade::Medium);
        assert_eq!(s[0].points, 3);
        assert_eq!(s[0].first, Some(YearMonth::new(2019, 11)));
        assert_eq!(s[0].last, Some(YearMonth::new(2020, 1)));
        assert_eq!(s[0].min_price, 10_200.0);
        assert_eq!(s[0].max_price, 10_500.0);
        assert_eq!(s[0].last_price, 10_350.0);
    }
}
