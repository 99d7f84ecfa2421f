//! Least squares solver.
//!
//! The polynomial trend fit solves a small problem of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! where `x_i` is a Vandermonde row `[1, u, u², …]`.
//!
//! Implementation choices:
//! - SVD handles the tall design matrix (many months, few coefficients) and
//!   degrades gracefully when columns are close to collinear.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - The parameter dimension is tiny (degree + 1), so SVD cost is negligible.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() != y.len() || x.ncols() == 0 {
        return None;
    }

    let svd = x.clone().svd(true, true);

    // Rank-deficient designs (e.g. fewer distinct abscissae than coefficients)
    // show up as a singular value far below the largest one.
    let max_sv = svd.singular_values.max();
    let min_sv = svd.singular_values.min();
    if !(max_sv.is_finite() && max_sv > 0.0) || min_sv <= max_sv * 1e-12 {
        return None;
    }

    let beta = svd.solve(y, 1e-12).ok()?;
    if beta.iter().all(|v| v.is_finite()) {
        Some(beta)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn least_squares_rejects_rank_deficient_design() {
        // Two identical rows cannot pin down a line and a quadratic term.
        let x = DMatrix::from_row_slice(2, 3, &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 1.0]);
        assert!(solve_least_squares(&x, &y).is_none());
    }

    #[test]
    fn least_squares_rejects_shape_mismatch() {
        let x = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert!(solve_least_squares(&x, &y).is_none());
    }
}
