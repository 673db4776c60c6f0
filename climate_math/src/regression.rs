//! Ordinary least squares regression
//!
//! Fits `y = X b + e` through the normal equations and reports the
//! coefficient standard errors, t-ratios and Gaussian information criteria
//! needed by unit-root tests.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Result of an ordinary least squares fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlsFit {
    /// Estimated coefficients, one per regressor column
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients
    pub std_errors: Vec<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
    /// Number of observations (rows)
    pub n_obs: usize,
}

impl OlsFit {
    /// Number of estimated parameters
    pub fn n_params(&self) -> usize {
        self.coefficients.len()
    }

    /// t-ratio of a single coefficient
    pub fn t_value(&self, index: usize) -> Option<f64> {
        let coef = self.coefficients.get(index)?;
        let se = self.std_errors.get(index)?;
        Some(coef / se)
    }

    /// Gaussian log-likelihood evaluated at the maximum likelihood variance
    pub fn log_likelihood(&self) -> f64 {
        let n = self.n_obs as f64;
        -0.5 * n * ((2.0 * PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    /// Akaike information criterion
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.n_params() as f64
    }

    /// Bayesian (Schwarz) information criterion
    pub fn bic(&self) -> f64 {
        -2.0 * self.log_likelihood() + (self.n_obs as f64).ln() * self.n_params() as f64
    }
}

/// Fit `y` on the regressor rows `x` (row-major, one row per observation)
pub fn ols(y: &[f64], x: &[Vec<f64>]) -> Result<OlsFit> {
    let n = y.len();
    if x.len() != n {
        return Err(MathError::InvalidInput(format!(
            "Response has {} rows but design matrix has {}",
            n,
            x.len()
        )));
    }

    let k = x.first().map(|row| row.len()).unwrap_or(0);
    if k == 0 {
        return Err(MathError::InvalidInput(
            "Design matrix has no columns".to_string(),
        ));
    }
    if x.iter().any(|row| row.len() != k) {
        return Err(MathError::InvalidInput(
            "Design matrix rows have different lengths".to_string(),
        ));
    }
    if n <= k {
        return Err(MathError::InsufficientData(format!(
            "OLS with {} regressors needs more than {} observations, have {}",
            k, k, n
        )));
    }

    // X'X and X'y
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &yi) in x.iter().zip(y) {
        for i in 0..k {
            xty[i] += row[i] * yi;
            for j in i..k {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..k {
        for j in 0..i {
            xtx[i][j] = xtx[j][i];
        }
    }

    let xtx_inv = invert(&xtx)?;
    let coefficients: Vec<f64> = (0..k)
        .map(|i| (0..k).map(|j| xtx_inv[i][j] * xty[j]).sum())
        .collect();

    let ssr: f64 = x
        .iter()
        .zip(y)
        .map(|(row, &yi)| {
            let fitted: f64 = row.iter().zip(&coefficients).map(|(a, b)| a * b).sum();
            (yi - fitted).powi(2)
        })
        .sum();

    if !ssr.is_finite() || ssr <= 0.0 {
        return Err(MathError::CalculationError(
            "Regression residuals vanish; the fit is degenerate".to_string(),
        ));
    }

    let sigma2 = ssr / (n - k) as f64;
    let std_errors = (0..k).map(|i| (sigma2 * xtx_inv[i][i]).sqrt()).collect();

    Ok(OlsFit {
        coefficients,
        std_errors,
        ssr,
        n_obs: n,
    })
}

/// Gauss-Jordan inversion with partial pivoting
///
/// The matrix is first scaled to a unit diagonal, so the singularity check
/// depends on how collinear the regressors are, not on their magnitude.
fn invert(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let k = matrix.len();
    let diagonal: Vec<f64> = (0..k).map(|i| matrix[i][i]).collect();
    if diagonal.iter().any(|d| !d.is_finite() || *d <= 0.0) {
        return Err(MathError::CalculationError(
            "Design matrix is singular; a regressor is identically zero".to_string(),
        ));
    }
    let root: Vec<f64> = diagonal.iter().map(|d| d.sqrt()).collect();

    let mut a: Vec<Vec<f64>> = (0..k)
        .map(|i| (0..k).map(|j| matrix[i][j] / (root[i] * root[j])).collect())
        .collect();
    let mut inv: Vec<Vec<f64>> = (0..k)
        .map(|i| (0..k).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();
    let tolerance = 1e-12;

    for col in 0..k {
        let pivot_row = (col..k)
            .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
            .unwrap_or(col);

        if a[pivot_row][col].abs() < tolerance {
            return Err(MathError::CalculationError(
                "Design matrix is singular; regressors are collinear".to_string(),
            ));
        }

        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = a[col][col];
        for j in 0..k {
            a[col][j] /= pivot;
            inv[col][j] /= pivot;
        }

        for row in 0..k {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..k {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }

    for i in 0..k {
        for j in 0..k {
            inv[i][j] /= root[i] * root[j];
        }
    }
    Ok(inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn design(xs: &[f64]) -> Vec<Vec<f64>> {
        xs.iter().map(|&x| vec![1.0, x]).collect()
    }

    #[test]
    fn test_simple_line() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [1.1, 2.9, 5.2, 6.8, 9.1];

        let fit = ols(&ys, &design(&xs)).unwrap();

        // Closed form: slope = Sxy / Sxx = 19.9 / 10, intercept = ybar - slope * xbar
        assert_relative_eq!(fit.coefficients[1], 1.99, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[0], 5.02 - 1.99 * 2.0, epsilon = 1e-10);
        assert_eq!(fit.n_obs, 5);
        assert_eq!(fit.n_params(), 2);
    }

    #[test]
    fn test_standard_errors() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [1.1, 2.9, 5.2, 6.8, 9.1];
        let fit = ols(&ys, &design(&xs)).unwrap();

        let sigma2 = fit.ssr / 3.0;
        assert_relative_eq!(fit.std_errors[1], (sigma2 / 10.0).sqrt(), epsilon = 1e-10);
        assert_relative_eq!(
            fit.t_value(1).unwrap(),
            fit.coefficients[1] / fit.std_errors[1]
        );
    }

    #[test]
    fn test_information_criteria() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [0.3, 1.1, 1.8, 3.4, 3.9, 5.2];
        let fit = ols(&ys, &design(&xs)).unwrap();

        let n = 6.0;
        let llf = -0.5 * n * ((2.0 * PI).ln() + (fit.ssr / n).ln() + 1.0);
        assert_relative_eq!(fit.log_likelihood(), llf);
        assert_relative_eq!(fit.aic(), -2.0 * llf + 4.0);
        assert_relative_eq!(fit.bic(), -2.0 * llf + n.ln() * 2.0);
    }

    #[test]
    fn test_collinear_columns_rejected() {
        let x: Vec<Vec<f64>> = (0..6).map(|i| vec![1.0, 2.0, i as f64]).collect();
        let y = [1.0, 2.0, 2.5, 4.0, 5.5, 6.0];

        let err = ols(&y, &x).unwrap_err();
        assert!(matches!(err, MathError::CalculationError(_)));
    }

    #[test]
    fn test_small_magnitude_regressors() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [1.1, 2.9, 5.2, 6.8, 9.1];
        let reference = ols(&ys, &design(&xs)).unwrap();

        let tiny_xs: Vec<f64> = xs.iter().map(|x| x * 1e-9).collect();
        let fit = ols(&ys, &design(&tiny_xs)).unwrap();

        assert_relative_eq!(fit.coefficients[0], reference.coefficients[0], epsilon = 1e-6);
        assert_relative_eq!(
            fit.coefficients[1] * 1e-9,
            reference.coefficients[1],
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_zero_column_rejected() {
        let x: Vec<Vec<f64>> = (0..5).map(|i| vec![1.0, 0.0, i as f64]).collect();
        let y = [1.0, 2.0, 2.5, 4.0, 5.5];

        assert!(matches!(
            ols(&y, &x).unwrap_err(),
            MathError::CalculationError(_)
        ));
    }

    #[test]
    fn test_too_few_rows() {
        let x = vec![vec![1.0, 0.0], vec![1.0, 1.0]];
        let y = [1.0, 2.0];

        let err = ols(&y, &x).unwrap_err();
        assert!(matches!(err, MathError::InsufficientData(_)));
    }

    #[test]
    fn test_mismatched_rows() {
        let x = vec![vec![1.0], vec![1.0]];
        assert!(ols(&[1.0, 2.0, 3.0], &x).is_err());
    }
}
