//! Least-squares polynomial fitting.
//!
//! The interpolation and the AR coefficient estimate both reduce to small
//! linear least-squares problems. We use SVD to solve them robustly even when
//! the design matrix is tall (more rows than columns); the parameter dimension
//! is tiny (≤ 3 columns), so SVD performance is irrelevant here.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit a degree-`degree` polynomial through `(xs, ys)`.
///
/// Coefficients are returned lowest order first. Requires at least
/// `degree + 1` points; with exactly that many distinct abscissae the fit is
/// exact through every point.
pub fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> Option<Vec<f64>> {
    if xs.len() != ys.len() || xs.len() < degree + 1 {
        return None;
    }

    let x = DMatrix::from_fn(xs.len(), degree + 1, |row, col| xs[row].powi(col as i32));
    let y = DVector::from_row_slice(ys);

    solve_least_squares(&x, &y).map(|beta| beta.iter().copied().collect())
}

/// Evaluate a polynomial (lowest order first) at `x` via Horner's rule.
pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
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
    fn quadratic_through_three_points_is_exact() {
        // y = 1 + 2x + x^2
        let xs = [0.0, 2.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|&x| 1.0 + 2.0 * x + x * x).collect();

        let coeffs = polyfit(&xs, &ys, 2).unwrap();
        for &x in &xs {
            assert!((polyval(&coeffs, x) - (1.0 + 2.0 * x + x * x)).abs() < 1e-9);
        }
        // Interpolated point between anchors.
        assert!((polyval(&coeffs, 1.0) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn polyfit_rejects_underdetermined_input() {
        assert!(polyfit(&[0.0, 1.0], &[1.0, 2.0], 2).is_none());
    }
}
