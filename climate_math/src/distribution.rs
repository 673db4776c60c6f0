//! Standard normal helpers backed by `statrs`

use crate::{MathError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| MathError::CalculationError(e.to_string()))
}

/// Cumulative distribution function of N(0, 1)
pub fn normal_cdf(x: f64) -> Result<f64> {
    Ok(standard_normal()?.cdf(x))
}

/// Quantile function of N(0, 1) for `p` in the open interval (0, 1)
pub fn normal_quantile(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(MathError::InvalidInput(format!(
            "Probability must be in (0, 1), got {}",
            p
        )));
    }
    Ok(standard_normal()?.inverse_cdf(p))
}

/// Two-sided critical value for a confidence level, e.g. 1.96 for 0.95
pub fn two_sided_z(confidence_level: f64) -> Result<f64> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(MathError::InvalidInput(
            "Confidence level must be between 0 and 1".to_string(),
        ));
    }
    normal_quantile((1.0 + confidence_level) / 2.0)
}
