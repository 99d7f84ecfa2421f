//! Strategy selection for a prediction request.
//!
//! Rules:
//! 1. Targets must be valid calendar months strictly after the cutoff, and the
//!    regression degree must not exceed `MAX_DEGREE`.
//! 2. The target point is always extrapolated with polynomial regression.
//! 3. The previous month uses the natural cubic spline while it lies in a
//!    year before `historical_before_year`, and polynomial regression otherwise.

use crate::domain::{FitStrategy, MAX_DEGREE, PredictionPolicy, StrategyChoice, YearMonth};
use crate::error::AppError;

/// Reject targets the forecast does not serve.
pub fn validate_target(target: YearMonth, policy: &PredictionPolicy) -> Result<(), AppError> {
    if !target.is_valid() {
        return Err(AppError::Validation(format!(
            "Month must be between 1 and 12, got {}.",
            target.month
        )));
    }
    if policy.degree > MAX_DEGREE {
        return Err(AppError::Validation(format!(
            "Regression degree must be at most {MAX_DEGREE}, got {}.",
            policy.degree
        )));
    }
    if target <= policy.cutoff {
        return Err(AppError::Validation(format!(
            "Predictions are only available after {}; use the history view for {target}.",
            policy.cutoff
        )));
    }
    Ok(())
}

/// Pick the strategies for the target month and the month before it.
pub fn select_strategies(target: YearMonth, policy: &PredictionPolicy) -> StrategyChoice {
    let regression = FitStrategy::PolynomialRegression {
        degree: policy.degree,
    };
    let previous = if target.previous().year < policy.historical_before_year {
        FitStrategy::NaturalCubicSpline
    } else {
        regression
    };
    StrategyChoice {
        target: regression,
        previous,
    }
}
