//! Least-squares polynomial trend.
//!
//! Raw time points sit around `2000..2030`, so a cubic Vandermonde matrix in
//! raw years has columns spanning ~10 orders of magnitude. We fit in the
//! normalized variable `u = (t - shift) / scale` instead. The polynomials of a
//! given degree in `u` and in `t` are the same function space, so the
//! least-squares solution (and every prediction) is unchanged.

use nalgebra::{DMatrix, DVector};

use crate::math::solve_least_squares;

#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialTrend {
    shift: f64,
    scale: f64,
    /// Coefficients in ascending powers of `u`.
    coeffs: Vec<f64>,
}

impl PolynomialTrend {
    /// Fit a polynomial of `degree` to the points.
    ///
    /// Returns `None` when there are fewer than `degree + 1` points (or that
    /// count overflows), the
    /// lengths differ, or the design is rank deficient.
    pub fn fit(times: &[f64], prices: &[f64], degree: usize) -> Option<Self> {
        let n = times.len();
        let p = degree.checked_add(1)?;
        if n < p || prices.len() != n {
            return None;
        }

        let shift = times.iter().sum::<f64>() / n as f64;
        let spread = times.iter().map(|t| (t - shift).abs()).fold(0.0, f64::max);
        let scale = if spread > 0.0 { spread } else { 1.0 };

        let mut x = DMatrix::<f64>::zeros(n, p);
        let mut row = vec![0.0; p];
        for (i, &t) in times.iter().enumerate() {
            fill_design_row((t - shift) / scale, &mut row);
            for (j, v) in row.iter().enumerate() {
                x[(i, j)] = *v;
            }
        }
        let y = DVector::from_column_slice(prices);

        let beta = solve_least_squares(&x, &y)?;
        Some(Self {
            shift,
            scale,
            coeffs: beta.iter().copied().collect(),
        })
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let u = (t - self.shift) / self.scale;
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * u + c)
    }
}

/// Fill a Vandermonde row `[1, u, u², …]`.
///
/// The row length decides the degree.
pub fn fill_design_row(u: f64, out: &mut [f64]) {
    let mut pow = 1.0;
    for slot in out.iter_mut() {
        *slot = pow;
        pow *= u;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_row_powers() {
        let mut row = [0.0; 4];
        fill_design_row(2.0, &mut row);
        assert_eq!(row, [1.0, 2.0, 4.0, 8.0]);
    }

    #[test]
    fn recovers_exact_cubic_in_calendar_years() {
        let f = |t: f64| {
            let x = t - 2018.0;
            10_000.0 + 120.0 * x - 15.0 * x * x + 2.0 * x * x * x
        };
        let times: Vec<f64> = (0..72).map(|i| 2013.0 + i as f64 / 12.0).collect();
        let prices: Vec<f64> = times.iter().map(|&t| f(t)).collect();

        let poly = PolynomialTrend::fit(&times, &prices, 3).unwrap();
        for t in [2013.5, 2016.25, 2024.0, 2026.5] {
            let rel = (poly.evaluate(t) - f(t)).abs() / f(t).abs();
            assert!(rel < 1e-9, "t={t}: {} vs {}", poly.evaluate(t), f(t));
        }
    }

    #[test]
    fn least_squares_line_through_noisy_points() {
        // Best line through (0,0), (1,1), (2,1), (3,2) is y = 0.1 + 0.6x.
        let poly = PolynomialTrend::fit(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 1.0, 2.0], 1).unwrap();
        assert!((poly.evaluate(0.0) - 0.1).abs() < 1e-10);
        assert!((poly.evaluate(10.0) - 6.1).abs() < 1e-10);
    }

    #[test]
    fn degree_zero_is_the_mean() {
        let poly = PolynomialTrend::fit(&[1.0, 2.0, 3.0], &[3.0, 6.0, 9.0], 0).unwrap();
        assert!((poly.evaluate(100.0) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn too_few_points() {
        assert!(PolynomialTrend::fit(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], 3).is_none());
        assert!(PolynomialTrend::fit(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 5.0], 3).is_some());
    }

    #[test]
    fn maximal_degree_is_rejected_without_overflow() {
        assert!(PolynomialTrend::fit(&[1.0, 2.0], &[1.0, 2.0], usize::MAX).is_none());
    }
}
