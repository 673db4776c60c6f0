//! Augmented Dickey-Fuller unit-root test
//!
//! Regresses the first difference of a series on a constant, its lagged
//! level and `k` lagged differences:
//!
//! ```text
//! Δy_t = α + γ·y_{t-1} + Σ_{i=1..k} β_i·Δy_{t-i} + ε_t
//! ```
//!
//! The test statistic is the t-ratio of γ. P-values come from MacKinnon's
//! (1994) response surface and critical values from MacKinnon (2010), both
//! for the constant-only regression.

use crate::data::TimeSeries;
use crate::error::{AnalysisError, Result};
use climate_math::distribution::normal_cdf;
use climate_math::regression::{ols, OlsFit};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Fewest observations the test accepts
pub const MIN_OBSERVATIONS: usize = 13;

/// How the number of lagged differences is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LagSelection {
    /// Minimise the Akaike information criterion
    #[default]
    Aic,
    /// Minimise the Bayesian information criterion
    Bic,
    /// Use exactly this many lags
    Fixed(usize),
}

impl fmt::Display for LagSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LagSelection::Aic => f.write_str("aic"),
            LagSelection::Bic => f.write_str("bic"),
            LagSelection::Fixed(k) => write!(f, "{}", k),
        }
    }
}

impl FromStr for LagSelection {
    type Err = AnalysisError;

    /// Accepts `aic`, `bic` or a lag count
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "aic" => Ok(LagSelection::Aic),
            "bic" => Ok(LagSelection::Bic),
            other => other.parse::<usize>().map(LagSelection::Fixed).map_err(|_| {
                AnalysisError::InvalidParameter(format!(
                    "Lag policy must be aic, bic or a number, got \"{}\"",
                    s
                ))
            }),
        }
    }
}

/// Outcome of a unit-root test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationarityResult {
    /// ADF t-statistic of the lagged level
    pub statistic: f64,
    /// MacKinnon approximate p-value
    pub p_value: f64,
    /// Critical values keyed by "1%", "5%" and "10%"
    pub critical_values: BTreeMap<String, f64>,
    /// Number of lagged differences in the final regression
    pub used_lag: usize,
    /// Rows of the final regression
    pub n_obs: usize,
    /// Best information criterion value, when lags were selected automatically
    pub ic_best: Option<f64>,
}

impl StationarityResult {
    /// Whether the unit root is rejected at significance `alpha`
    pub fn is_stationary(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }

    /// Whether the statistic lies below the critical value for `label`
    pub fn rejects_at(&self, label: &str) -> Option<bool> {
        self.critical_values
            .get(label)
            .map(|critical| self.statistic < *critical)
    }
}

/// Run the test with AIC lag selection
pub fn analyze(series: &TimeSeries) -> Result<StationarityResult> {
    analyze_with(series, LagSelection::default())
}

/// Run the test with an explicit lag policy
pub fn analyze_with(series: &TimeSeries, lags: LagSelection) -> Result<StationarityResult> {
    let x = series.values();
    let n = x.len();
    if n < MIN_OBSERVATIONS {
        return Err(AnalysisError::InsufficientData(format!(
            "ADF test needs at least {} observations, have {}",
            MIN_OBSERVATIONS, n
        )));
    }

    let lag_cap = (n / 2).saturating_sub(2);
    let max_lag = match lags {
        LagSelection::Fixed(k) => {
            if k > lag_cap {
                return Err(AnalysisError::InsufficientData(format!(
                    "{} lags requested but a series of {} observations supports at most {}",
                    k, n, lag_cap
                )));
            }
            k
        }
        LagSelection::Aic | LagSelection::Bic => {
            let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
            schwert.min(lag_cap)
        }
    };

    let diffs: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

    let (used_lag, ic_best) = match lags {
        LagSelection::Fixed(k) => (k, None),
        LagSelection::Aic | LagSelection::Bic => {
            // Every candidate is fit on the common sample that max_lag allows
            let mut best: Option<(f64, usize)> = None;
            for k in 0..=max_lag {
                let fit = adf_regression(x, &diffs, k, max_lag)?;
                let ic = if lags == LagSelection::Aic {
                    fit.aic()
                } else {
                    fit.bic()
                };
                debug!("adf lag {}: information criterion {:.4}", k, ic);
                if best.map_or(true, |(b, _)| ic < b) {
                    best = Some((ic, k));
                }
            }
            let (ic, k) = best.ok_or_else(|| {
                AnalysisError::InsufficientData("No lag candidates to evaluate".to_string())
            })?;
            (k, Some(ic))
        }
    };

    let fit = adf_regression(x, &diffs, used_lag, used_lag)?;
    let statistic = fit.t_value(0).ok_or_else(|| {
        AnalysisError::ModelFit("ADF regression has no level coefficient".to_string())
    })?;
    let n_obs = fit.n_obs;

    debug!(
        "adf statistic {:.4} with {} lags over {} rows",
        statistic, used_lag, n_obs
    );

    Ok(StationarityResult {
        statistic,
        p_value: mackinnon_p_value(statistic)?,
        critical_values: mackinnon_critical_values(n_obs),
        used_lag,
        n_obs,
        ic_best,
    })
}

/// Fit the ADF regression with `lags` lagged differences on the sample that
/// `sample_lag` lags leave available
fn adf_regression(x: &[f64], diffs: &[f64], lags: usize, sample_lag: usize) -> Result<OlsFit> {
    let rows = diffs.len().saturating_sub(sample_lag);
    let n_params = lags + 2;
    if rows <= n_params {
        return Err(AnalysisError::InsufficientData(format!(
            "ADF regression with {} lags has {} rows for {} parameters",
            lags, rows, n_params
        )));
    }

    let mut y = Vec::with_capacity(rows);
    let mut design = Vec::with_capacity(rows);
    for j in sample_lag..diffs.len() {
        let mut row = Vec::with_capacity(n_params);
        row.push(x[j]);
        row.extend((1..=lags).map(|i| diffs[j - i]));
        row.push(1.0);
        design.push(row);
        y.push(diffs[j]);
    }

    Ok(ols(&y, &design)?)
}

// MacKinnon (1994) response surface, one variable, constant only
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

// MacKinnon (2010) finite-sample critical value surfaces, constant only
const CRITICAL_SURFACES: [(&str, [f64; 4]); 3] = [
    ("1%", [-3.43035, -6.5393, -16.786, -79.433]),
    ("5%", [-2.86154, -2.8903, -4.234, -40.040]),
    ("10%", [-2.56677, -1.5384, -2.809, 0.0]),
];

/// Approximate p-value of an ADF statistic
pub fn mackinnon_p_value(statistic: f64) -> Result<f64> {
    if statistic.is_nan() {
        return Err(AnalysisError::ValidationError(
            "ADF statistic is not a number".to_string(),
        ));
    }
    if statistic > TAU_MAX {
        return Ok(1.0);
    }
    if statistic < TAU_MIN {
        return Ok(0.0);
    }

    let coefficients: &[f64] = if statistic <= TAU_STAR {
        &TAU_SMALL_P
    } else {
        &TAU_LARGE_P
    };
    Ok(normal_cdf(polyval(coefficients, statistic))?)
}

/// Critical values for a regression with `n_obs` rows
pub fn mackinnon_critical_values(n_obs: usize) -> BTreeMap<String, f64> {
    let inv = 1.0 / n_obs as f64;
    CRITICAL_SURFACES
        .iter()
        .map(|(label, surface)| (label.to_string(), polyval(surface, inv)))
        .collect()
}

/// `c[0] + c[1]·x + c[2]·x² + …`
fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}
