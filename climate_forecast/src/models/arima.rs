//! ARIMA models for yearly climate series
//!
//! The series is differenced `d` times and an ARMA(p, q) recurrence is fitted
//! to the result by minimising the conditional sum of squares (CSS). Pre-sample
//! residuals are zero and the sum starts at observation `p`.
//!
//! The simplex search runs over unconstrained values that are mapped to
//! partial autocorrelations in (-1, 1) and then to polynomial coefficients, so
//! every candidate AR polynomial is stationary and every MA polynomial is
//! invertible.
//!
//! ```
//! use climate_forecast::data::TimeSeries;
//! use climate_forecast::models::arima::{forecast, ArimaOrder};
//!
//! let values: Vec<f64> = (0..40).map(|i| 20.0 + (i as f64 * 0.7).sin()).collect();
//! let series = TimeSeries::from_values(1980, values).unwrap();
//! let result = forecast(&series, ArimaOrder::new(1, 0, 0), 3).unwrap();
//!
//! assert_eq!(result.forecast_periods, vec![2020, 2021, 2022]);
//! ```

use crate::data::TimeSeries;
use crate::error::{AnalysisError, Result};
use crate::models::{FittedModel, ForecastModel, ForecastResult};
use climate_math::descriptive;
use climate_math::distribution::two_sided_z;
use climate_math::optimize::{nelder_mead, NelderMeadConfig};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Variance, relative to the mean square, below which a differenced series
/// counts as constant
const MIN_RELATIVE_VARIANCE: f64 = 1e-12;

/// Partial autocorrelations beyond this are reported as near the boundary
const BOUNDARY_PARTIAL: f64 = 0.995;

/// Orders of an ARIMA(p, d, q) model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// Autoregressive order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// Moving-average order
    pub q: usize,
}

impl ArimaOrder {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

impl FromStr for ArimaOrder {
    type Err = AnalysisError;

    /// Parses `"p,d,q"`, optionally wrapped in parentheses
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            AnalysisError::InvalidParameter(format!(
                "Expected an order like \"1,1,1\", got \"{}\"",
                s
            ))
        };
        let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
        let parts = inner
            .split(',')
            .map(|part| part.trim().parse::<usize>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>>>()?;

        match parts.as_slice() {
            [p, d, q] => Ok(Self::new(*p, *d, *q)),
            _ => Err(invalid()),
        }
    }
}

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// Model orders
    order: ArimaOrder,
    /// Simplex search settings
    solver: NelderMeadConfig,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            name: order.to_string(),
            order,
            solver: NelderMeadConfig {
                max_iter: 10_000,
                f_tolerance: 1e-9,
                x_tolerance: 1e-7,
                initial_step: 0.1,
            },
        }
    }

    /// Replace the simplex search settings
    pub fn with_solver(mut self, solver: NelderMeadConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Get the model orders
    pub fn order(&self) -> ArimaOrder {
        self.order
    }
}

impl ForecastModel for ArimaModel {
    type Fitted = FittedArima;

    fn fit(&self, series: &TimeSeries) -> Result<FittedArima> {
        let ArimaOrder { p, d, q } = self.order;
        let values = series.values();

        if d >= values.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "Differencing order {} needs more than {} observations",
                d,
                values.len()
            )));
        }

        // Last value of every differencing level, used to re-integrate forecasts
        let mut anchors = Vec::with_capacity(d);
        let mut differenced = values.to_vec();
        for _ in 0..d {
            anchors.push(differenced[differenced.len() - 1]);
            differenced = difference(&differenced);
        }

        let with_intercept = d == 0;
        let n_params = p + q + usize::from(with_intercept);
        let n_eff = differenced.len().saturating_sub(p);
        if differenced.len() < 2 || n_eff <= n_params {
            return Err(AnalysisError::InsufficientData(format!(
                "{} needs more than {} usable observations after differencing, got {}",
                self.name, n_params, n_eff
            )));
        }

        let mean_square =
            differenced.iter().map(|v| v * v).sum::<f64>() / differenced.len() as f64;
        if descriptive::sample_variance(&differenced)? <= MIN_RELATIVE_VARIANCE * mean_square {
            return Err(AnalysisError::ModelFit(format!(
                "Series is constant after {} difference(s)",
                d
            )));
        }

        let intercept = if with_intercept {
            Some(descriptive::mean(&differenced)?)
        } else {
            None
        };
        let mu = intercept.unwrap_or(0.0);
        let centered: Vec<f64> = differenced.iter().map(|v| v - mu).collect();

        let (ar, ma, iterations) = if p + q == 0 {
            (Vec::new(), Vec::new(), 0)
        } else {
            // CSS in units of the series variance keeps the stopping rule scale-free
            let scale = centered.iter().map(|v| v * v).sum::<f64>() / centered.len() as f64;
            let objective = |params: &[f64]| {
                let (ar, ma) = unpack(params, p);
                conditional_residuals(&centered, &ar, &ma)[p..]
                    .iter()
                    .map(|e| e * e)
                    .sum::<f64>()
                    / scale
            };
            let outcome = nelder_mead(objective, &vec![0.0; p + q], &self.solver)?;

            if !outcome.converged {
                return Err(AnalysisError::ModelFit(format!(
                    "{} estimation did not converge after {} iterations (conditional sum of squares {:.6e})",
                    self.name,
                    outcome.iterations,
                    outcome.value * scale
                )));
            }
            debug!(
                "{} converged after {} iterations, CSS {:.6e}",
                self.name,
                outcome.iterations,
                outcome.value * scale
            );
            if outcome
                .point
                .iter()
                .any(|&u| partial_autocorrelation(u).abs() > BOUNDARY_PARTIAL)
            {
                warn!(
                    "{} estimate lies close to the stationarity or invertibility boundary",
                    self.name
                );
            }

            let (ar, ma) = unpack(&outcome.point, p);
            (ar, ma, outcome.iterations)
        };

        let residuals = conditional_residuals(&centered, &ar, &ma);
        let css: f64 = residuals[p..].iter().map(|e| e * e).sum();
        let n = n_eff as f64;
        let sigma2 = css / n;
        if sigma2 <= 0.0 || !sigma2.is_finite() {
            return Err(AnalysisError::ModelFit(format!(
                "{} produced a degenerate noise variance {}",
                self.name, sigma2
            )));
        }

        let log_likelihood = -0.5 * n * ((2.0 * PI * sigma2).ln() + 1.0);
        // Noise variance counts as a parameter
        let k = (n_params + 1) as f64;

        Ok(FittedArima {
            name: self.name.clone(),
            order: self.order,
            ar_coefficients: ar,
            ma_coefficients: ma,
            intercept,
            sigma2,
            log_likelihood,
            aic: -2.0 * log_likelihood + 2.0 * k,
            bic: -2.0 * log_likelihood + n.ln() * k,
            n_obs: n_eff,
            iterations,
            residuals,
            centered,
            anchors,
            last_period: series.last_period(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// ARIMA model fitted by conditional sum of squares
#[derive(Debug, Clone, Serialize)]
pub struct FittedArima {
    name: String,
    order: ArimaOrder,
    ar_coefficients: Vec<f64>,
    ma_coefficients: Vec<f64>,
    intercept: Option<f64>,
    sigma2: f64,
    log_likelihood: f64,
    aic: f64,
    bic: f64,
    n_obs: usize,
    iterations: usize,
    residuals: Vec<f64>,
    #[serde(skip)]
    centered: Vec<f64>,
    #[serde(skip)]
    anchors: Vec<f64>,
    #[serde(skip)]
    last_period: i32,
}

impl FittedArima {
    /// Model orders
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// AR coefficients φ₁..φₚ
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    /// MA coefficients θ₁..θ_q
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Mean of the series; only estimated without differencing
    pub fn intercept(&self) -> Option<f64> {
        self.intercept
    }

    /// Noise variance σ²
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Residuals of the differenced series; the first `p` are zero
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn bic(&self) -> f64 {
        self.bic
    }

    /// Observations entering the conditional sum of squares
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    /// Simplex iterations spent on estimation
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Point forecast with prediction intervals at `level`, e.g. 0.95
    pub fn forecast_with_intervals(&self, horizon: usize, level: f64) -> Result<ForecastResult> {
        if !(level > 0.0 && level < 1.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "Confidence level must be between 0 and 1, got {}",
                level
            )));
        }
        let point = self.forecast(horizon)?;
        let z = two_sided_z(level)?;

        let mut cumulative = 0.0;
        let intervals = self
            .psi_weights(horizon)
            .iter()
            .zip(&point.forecast_values)
            .map(|(psi, value)| {
                cumulative += psi * psi;
                let margin = z * (self.sigma2 * cumulative).sqrt();
                (value - margin, value + margin)
            })
            .collect();

        point.with_intervals(intervals, level)
    }

    /// Forecasts of the undifferenced series, re-integrated through every level
    fn point_forecast(&self, horizon: usize) -> Vec<f64> {
        let m = self.centered.len();
        let mut z = self.centered.clone();
        let mut e = self.residuals.clone();

        for _ in 0..horizon {
            let t = z.len();
            let ar_part: f64 = self
                .ar_coefficients
                .iter()
                .enumerate()
                .map(|(i, phi)| phi * z[t - 1 - i])
                .sum();
            let ma_part: f64 = self
                .ma_coefficients
                .iter()
                .enumerate()
                .filter(|(j, _)| *j < t)
                .map(|(j, theta)| theta * e[t - 1 - j])
                .sum();
            z.push(ar_part + ma_part);
            // Future shocks have zero expectation
            e.push(0.0);
        }

        let mu = self.intercept.unwrap_or(0.0);
        let mut path: Vec<f64> = z[m..].iter().map(|v| v + mu).collect();
        for anchor in self.anchors.iter().rev() {
            let mut level = *anchor;
            for value in path.iter_mut() {
                level += *value;
                *value = level;
            }
        }
        path
    }

    /// ψ-weights of φ(B)(1 − B)^d ψ(B) = θ(B)
    fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        let mut ar_poly = vec![1.0];
        ar_poly.extend(self.ar_coefficients.iter().map(|c| -c));
        for _ in 0..self.order.d {
            let mut next = vec![0.0; ar_poly.len() + 1];
            for (i, c) in ar_poly.iter().enumerate() {
                next[i] += c;
                next[i + 1] -= c;
            }
            ar_poly = next;
        }

        let mut psi: Vec<f64> = Vec::with_capacity(horizon);
        for j in 0..horizon {
            if j == 0 {
                psi.push(1.0);
                continue;
            }
            let mut value = self.ma_coefficients.get(j - 1).copied().unwrap_or(0.0);
            for i in 1..ar_poly.len().min(j + 1) {
                value -= ar_poly[i] * psi[j - i];
            }
            psi.push(value);
        }
        psi
    }
}

impl FittedModel for FittedArima {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(AnalysisError::InvalidParameter(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }

        let periods = future_periods(self.last_period, horizon)?;
        ForecastResult::new(self.point_forecast(horizon), periods)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fit an ARIMA model of the given order
pub fn fit(series: &TimeSeries, order: ArimaOrder) -> Result<FittedArima> {
    ArimaModel::new(order).fit(series)
}

/// Fit an ARIMA model and forecast the next `horizon` years
pub fn forecast(series: &TimeSeries, order: ArimaOrder, horizon: usize) -> Result<ForecastResult> {
    if horizon == 0 {
        return Err(AnalysisError::InvalidParameter(
            "Forecast horizon must be at least 1".to_string(),
        ));
    }
    fit(series, order)?.forecast(horizon)
}

/// The `horizon` years following `last`
fn future_periods(last: i32, horizon: usize) -> Result<Vec<i32>> {
    let out_of_range = || {
        AnalysisError::InvalidParameter(format!(
            "A horizon of {} years after {} leaves the representable years",
            horizon, last
        ))
    };
    let steps = i32::try_from(horizon).map_err(|_| out_of_range())?;
    (1..=steps)
        .map(|h| last.checked_add(h).ok_or_else(out_of_range))
        .collect()
}

fn difference(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

fn partial_autocorrelation(raw: f64) -> f64 {
    raw / (1.0 + raw * raw).sqrt()
}

/// Map unconstrained values to the coefficients of a stationary polynomial
/// `1 − c₁B − … − c_kB^k` via the Durbin-Levinson recursion
fn stationary_coefficients(raw: &[f64]) -> Vec<f64> {
    let mut coefficients: Vec<f64> = Vec::with_capacity(raw.len());
    for (k, &u) in raw.iter().enumerate() {
        let r = partial_autocorrelation(u);
        let previous = coefficients.clone();
        for i in 0..k {
            coefficients[i] = previous[i] - r * previous[k - 1 - i];
        }
        coefficients.push(r);
    }
    coefficients
}

fn unpack(params: &[f64], p: usize) -> (Vec<f64>, Vec<f64>) {
    let ar = stationary_coefficients(&params[..p]);
    // θ(B) = 1 + θ₁B + … is invertible when −θ is a stationary AR set
    let ma = stationary_coefficients(&params[p..])
        .into_iter()
        .map(|c| -c)
        .collect();
    (ar, ma)
}

fn conditional_residuals(z: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let p = ar.len();
    let mut e = vec![0.0; z.len()];
    for t in p..z.len() {
        let mut value = z[t];
        for (i, phi) in ar.iter().enumerate() {
            value -= phi * z[t - 1 - i];
        }
        for (j, theta) in ma.iter().enumerate() {
            if j < t {
                value -= theta * e[t - 1 - j];
            }
        }
        e[t] = value;
    }
    e
}
