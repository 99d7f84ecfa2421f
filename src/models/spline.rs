//! Natural cubic spline.
//!
//! On each interval `[t_i, t_{i+1}]` the curve is
//!
//! ```text
//! s_i(t) = a_i + b_i·dt + c_i·dt² + d_i·dt³,   dt = t - t_i
//! ```
//!
//! with continuous first and second derivatives at interior knots and zero
//! second derivative at both ends. Points outside the knot range are
//! extrapolated with the nearest boundary interval's cubic.

use crate::math::solve_tridiagonal;

#[derive(Debug, Clone, PartialEq)]
pub struct NaturalCubicSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl NaturalCubicSpline {
    /// Build the interpolant.
    ///
    /// `times` must be strictly increasing with at least two entries and the
    /// same length as `prices`; returns `None` otherwise.
    pub fn fit(times: &[f64], prices: &[f64]) -> Option<Self> {
        let n = times.len();
        if n < 2 || prices.len() != n {
            return None;
        }

        let h: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();
        if h.iter().any(|&hi| !(hi > 0.0)) {
            return None;
        }
        let slopes: Vec<f64> = (0..n - 1).map(|i| (prices[i + 1] - prices[i]) / h[i]).collect();

        // Second derivatives at the knots; both ends pinned to zero.
        let mut m = vec![0.0; n];
        if n > 2 {
            let interior = n - 2;
            let diag: Vec<f64> = (0..interior).map(|k| 2.0 * (h[k] + h[k + 1])).collect();
            let off: Vec<f64> = (1..interior).map(|k| h[k]).collect();
            let rhs: Vec<f64> = (0..interior).map(|k| 6.0 * (slopes[k + 1] - slopes[k])).collect();
            let solved = solve_tridiagonal(&off, &diag, &off, &rhs)?;
            m[1..n - 1].copy_from_slice(&solved);
        }

        let mut b = Vec::with_capacity(n - 1);
        let mut c = Vec::with_capacity(n - 1);
        let mut d = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            b.push(slopes[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0);
            c.push(m[i] / 2.0);
            d.push((m[i + 1] - m[i]) / (6.0 * h[i]));
        }

        Some(Self {
            knots: times.to_vec(),
            values: prices.to_vec(),
            b,
            c,
            d,
        })
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        // Knots return the stored value untouched.
        if let Ok(i) = self.knots.binary_search_by(|k| k.total_cmp(&t)) {
            return self.values[i];
        }

        let last_segment = self.knots.len() - 2;
        let seg = self
            .knots
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(last_segment);

        let dt = t - self.knots[seg];
        self.values[seg] + dt * (self.b[seg] + dt * (self.c[seg] + dt * self.d[seg]))
    }
}
