//! Tridiagonal linear solver (Thomas algorithm).
//!
//! The natural cubic spline reduces to a symmetric, strictly diagonally
//! dominant tridiagonal system for the interior second derivatives, so the
//! plain forward-sweep / back-substitution form is stable without pivoting.

/// Solve `A x = rhs` where `A` has sub-diagonal `lower`, diagonal `diag` and
/// super-diagonal `upper`.
///
/// `lower` and `upper` have length `n - 1`. Returns `None` on a shape mismatch
/// or a zero pivot.
pub fn solve_tridiagonal(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &[f64]) -> Option<Vec<f64>> {
    let n = diag.len();
    if n == 0 {
        return Some(Vec::new());
    }
    if rhs.len() != n || lower.len() != n - 1 || upper.len() != n - 1 {
        return None;
    }

    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    if diag[0] == 0.0 {
        return None;
    }
    c_prime[0] = if n > 1 { upper[0] / diag[0] } else { 0.0 };
    d_prime[0] = rhs[0] / diag[0];

    for i in 1..n {
        let denom = diag[i] - lower[i - 1] * c_prime[i - 1];
        if denom == 0.0 || !denom.is_finite() {
            return None;
        }
        if i < n - 1 {
            c_prime[i] = upper[i] / denom;
        }
        d_prime[i] = (rhs[i] - lower[i - 1] * d_prime[i - 1]) / denom;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }

    Some(x)
}
