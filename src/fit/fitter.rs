//! Fit a single series under a single strategy.
//!
//! This is the only place that checks strategy-specific minimum sizes, so the
//! models themselves can stay infallible apart from numerical breakdown.

use crate::domain::{FitStrategy, Series};
use crate::error::AppError;
use crate::models::{NaturalCubicSpline, PolynomialTrend};

#[derive(Debug, Clone, PartialEq)]
enum CurveKind {
    Spline(NaturalCubicSpline),
    Polynomial(PolynomialTrend),
}

/// An immutable, evaluable curve over time points.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCurve {
    strategy: FitStrategy,
    kind: CurveKind,
}

impl FittedCurve {
    pub fn strategy(&self) -> FitStrategy {
        self.strategy
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        match &self.kind {
            CurveKind::Spline(s) => s.evaluate(t),
            CurveKind::Polynomial(p) => p.evaluate(t),
        }
    }

    /// Evaluate and reject non-finite output.
    pub fn evaluate_checked(&self, t: f64) -> Result<f64, AppError> {
        let y = self.evaluate(t);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(AppError::Numerical(format!(
                "{} produced a non-finite value at t={t:.4}",
                self.strategy
            )))
        }
    }
}

/// Build a curve for `series` under `strategy`.
///
/// Fails with `InsufficientData` when the series is shorter than the strategy
/// needs, and with `Numerical` when the solver breaks down.
pub fn fit(series: &Series, strategy: FitStrategy) -> Result<FittedCurve, AppError> {
    let required = strategy.min_points();
    if series.len() < required {
        return Err(AppError::InsufficientData {
            strategy: strategy.to_string(),
            required,
            got: series.len(),
        });
    }

    let kind = match strategy {
        FitStrategy::NaturalCubicSpline => NaturalCubicSpline::fit(series.times(), series.prices())
            .map(CurveKind::Spline),
        FitStrategy::PolynomialRegression { degree } => {
            PolynomialTrend::fit(series.times(), series.prices(), degree).map(CurveKind::Polynomial)
        }
    }
    .ok_or_else(|| AppError::Numerical(format!("Failed to fit {strategy} on {} points.", series.len())))?;

    log::debug!("fitted {strategy} on {} points", series.len());
    Ok(FittedCurve { strategy, kind })
}
