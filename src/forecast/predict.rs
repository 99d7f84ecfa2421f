//! Per-grade price prediction.
//!
//! For each grade we fit the target-month strategy and (when it differs) the
//! previous-month strategy, then evaluate both curves. A grade that is too
//! short for its strategy gets an error field; the request as a whole still
//! succeeds.

use std::collections::BTreeMap;

use crate::domain::{
    GradePrediction, PredictionPolicy, PredictionResult, Series, SeriesMap, StrategyChoice, YearMonth,
};
use crate::error::AppError;
use crate::fit::{fit, select_strategies, validate_target};

/// Error field for grades with fewer than two points.
pub const NOT_ENOUGH_DATA: &str = "Not enough data to interpolate";

/// Estimate every grade's price at `target` and at the month before.
///
/// Fails only for invalid targets (`Validation`) and numerical breakdown;
/// insufficient data is reported per grade.
pub fn predict(
    series: &SeriesMap,
    target: YearMonth,
    policy: &PredictionPolicy,
) -> Result<PredictionResult, AppError> {
    validate_target(target, policy)?;

    let choice = select_strategies(target, policy);
    let previous = target.previous();
    log::info!(
        "predicting {target} with {} (previous {previous} with {})",
        choice.target,
        choice.previous
    );

    let mut predictions = BTreeMap::new();
    for (&grade, s) in series {
        let outcome = match predict_grade(s, target, previous, choice) {
            Ok(p) => p,
            Err(e @ AppError::InsufficientData { .. }) => {
                log::warn!("{grade}: {e}");
                GradePrediction::Error { error: e.to_string() }
            }
            Err(e) => return Err(e),
        };
        predictions.insert(grade, outcome);
    }

    Ok(PredictionResult {
        year: target.year,
        month: target.month,
        predictions,
    })
}

fn predict_grade(
    series: &Series,
    target: YearMonth,
    previous: YearMonth,
    choice: StrategyChoice,
) -> Result<GradePrediction, AppError> {
    if series.len() < 2 {
        return Ok(GradePrediction::Error {
            error: NOT_ENOUGH_DATA.to_string(),
        });
    }

    let target_curve = fit(series, choice.target)?;
    let estimated_price = target_curve.evaluate_checked(target.time_point())?;

    let previous_price = if choice.previous == choice.target {
        target_curve.evaluate_checked(previous.time_point())?
    } else {
        fit(series, choice.previous)?.evaluate_checked(previous.time_point())?
    };

    Ok(GradePrediction::Estimate {
        estimated_price,
        previous_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{time_point, FitStrategy, QualityGrade};

    /// Monthly prices for Jan 2023 .. Jan 2024 (13 points).
    fn premium_2023() -> Series {
        let mut times = Vec::new();
        let mut prices = Vec::new();
        for m in 1..=12 {
            times.push(time_point(2023, m));
            prices.push(13_000.0 + 50.0 * m as f64 + 30.0 * (m as f64).cos());
        }
        times.push(time_point(2024, 1));
        prices.push(13_700.0);
        Series::new(times, prices).unwrap()
    }

    fn estimate(p: &GradePrediction) -> (f64, f64) {
        match p {
            GradePrediction::Estimate {
                estimated_price,
                previous_price,
            } => (*estimated_price, *previous_price),
            GradePrediction::Error { error } => panic!("unexpected error: {error}"),
        }
    }

    #[test]
    fn june_2024_uses_regression_for_both_points() {
        let mut map = SeriesMap::new();
        map.insert(QualityGrade::Premium, premium_2023());

        let result = predict(&map, YearMonth::new(2024, 6), &PredictionPolicy::default()).unwrap();
        assert_eq!((result.year, result.month), (2024, 6));

        let curve = fit(&map[&QualityGrade::Premium], FitStrategy::PolynomialRegression { degree: 3 }).unwrap();
        let (est, prev) = estimate(&result.predictions[&QualityGrade::Premium]);
        assert_eq!(est, curve.evaluate(time_point(2024, 6)));
        assert_eq!(prev, curve.evaluate(time_point(2024, 5)));
    }

    #[test]
    fn january_2024_previous_month_is_interpolated() {
        let mut map = SeriesMap::new();
        map.insert(QualityGrade::Premium, premium_2023());

        let result = predict(&map, YearMonth::new(2024, 1), &PredictionPolicy::default()).unwrap();
        let (_, prev) = estimate(&result.predictions[&QualityGrade::Premium]);
        // December 2023 is a stored point, and the spline passes through it.
        assert_eq!(prev, 13_000.0 + 600.0 + 30.0 * 12f64.cos());
    }

    #[test]
    fn before_cutoff_is_rejected_regardless_of_data() {
        let mut map = SeriesMap::new();
        map.insert(QualityGrade::Premium, premium_2023());
        let policy = PredictionPolicy::default();

        let err = predict(&map, YearMonth::new(2023, 6), &policy).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = predict(&SeriesMap::new(), YearMonth::new(2023, 6), &policy).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn extreme_degree_is_a_validation_error() {
        let mut map = SeriesMap::new();
        map.insert(QualityGrade::Premium, premium_2023());
        let policy = PredictionPolicy {
            degree: usize::MAX,
            ..PredictionPolicy::default()
        };

        let err = predict(&map, YearMonth::new(2025, 3), &policy).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{err}");
    }

    #[test]
    fn single_point_grade_gets_error_field() {
        let mut map = SeriesMap::new();
        map.insert(QualityGrade::Premium, premium_2023());
        map.insert(
            QualityGrade::LowQuality,
            Series::new(vec![time_point(2023, 5)], vec![11_000.0]).unwrap(),
        );

        let result = predict(&map, YearMonth::new(2024, 3), &PredictionPolicy::default()).unwrap();
        assert_eq!(
            result.predictions[&QualityGrade::LowQuality],
            GradePrediction::Error {
                error: NOT_ENOUGH_DATA.to_string()
            }
        );
        let (est, prev) = estimate(&result.predictions[&QualityGrade::Premium]);
        assert!(est.is_finite() && prev.is_finite());
        assert!(!result.predictions.contains_key(&QualityGrade::Medium));
    }

    #[test]
    fn short_grade_for_regression_gets_error_field() {
        let mut map = SeriesMap::new();
        map.insert(
            QualityGrade::Medium,
            Series::new(
                vec![time_point(2023, 1), time_point(2023, 2), time_point(2023, 3)],
                vec![12_000.0, 12_100.0, 12_150.0],
            )
            .unwrap(),
        );

        let result = predict(&map, YearMonth::new(2024, 6), &PredictionPolicy::default()).unwrap();
        let medium = &result.predictions[&QualityGrade::Medium];
        assert!(medium.is_error());
        if let GradePrediction::Error { error } = medium {
            assert!(error.contains("need 4 points, got 3"), "{error}");
        }
    }

    #[test]
    fn serialized_result_has_flat_grade_fields() {
        let mut map = SeriesMap::new();
        map.insert(
            QualityGrade::Premium,
            Series::new(vec![time_point(2023, 1)], vec![1.0]).unwrap(),
        );
        let result = predict(&map, YearMonth::new(2025, 2), &PredictionPolicy::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["year"], 2025);
        assert_eq!(json["month"], 2);
        assert_eq!(json["predictions"]["premium"]["error"], NOT_ENOUGH_DATA);
    }
}
