//! Rolling-window statistics
//!
//! Trailing windows only: the value at index `i` summarises
//! `series[i - window + 1 ..= i]`, so nothing looks ahead. Positions without
//! a full window of history are reported as `None`.

use crate::data::TimeSeries;
use crate::error::{AnalysisError, Result};
use climate_math::rolling::RollingWindow;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Moving mean and moving sample standard deviation aligned with the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingWindowResult {
    /// Window size used
    pub window: usize,
    /// Periods of the input series
    pub periods: Vec<i32>,
    /// Moving mean, `None` where history is insufficient
    pub rolling_mean: Vec<Option<f64>>,
    /// Moving sample standard deviation, `None` where undefined
    pub rolling_std: Vec<Option<f64>>,
}

impl RollingWindowResult {
    /// Number of defined moving-mean entries
    pub fn defined_means(&self) -> usize {
        self.rolling_mean.iter().flatten().count()
    }

    /// Number of defined moving-std entries
    pub fn defined_stds(&self) -> usize {
        self.rolling_std.iter().flatten().count()
    }

    /// DataFrame with `Year`, `rolling_mean` and `rolling_std`; missing
    /// entries become nulls
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Series::new("Year", self.periods.clone()),
            Series::new("rolling_mean", self.rolling_mean.clone()),
            Series::new("rolling_std", self.rolling_std.clone()),
        ])?;
        Ok(df)
    }
}

/// Compute the moving mean and sample standard deviation over `window`
pub fn rolling_stats(series: &TimeSeries, window: usize) -> Result<RollingWindowResult> {
    if window < 1 || window > series.len() {
        return Err(AnalysisError::InvalidWindow(format!(
            "Window must be between 1 and the series length {}, got {}",
            series.len(),
            window
        )));
    }

    let mut acc = RollingWindow::new(window)?;
    let mut rolling_mean = Vec::with_capacity(series.len());
    let mut rolling_std = Vec::with_capacity(series.len());

    for &value in series.values() {
        acc.update(value);
        if acc.is_full() {
            rolling_mean.push(Some(acc.mean()?));
            // A single-value window has no sample standard deviation
            rolling_std.push(if window > 1 {
                Some(acc.sample_std()?)
            } else {
                None
            });
        } else {
            rolling_mean.push(None);
            rolling_std.push(None);
        }
    }

    Ok(RollingWindowResult {
        window,
        periods: series.periods().to_vec(),
        rolling_mean,
        rolling_std,
    })
}
