//! Forecasting models for yearly climate series

use crate::data::TimeSeries;
use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Forecast result containing predicted values for consecutive future years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawForecastResult")]
pub struct ForecastResult {
    /// Forecasted values, one per step
    pub forecast_values: Vec<f64>,
    /// Years the values belong to
    pub forecast_periods: Vec<i32>,
    /// Prediction intervals as (lower, upper), when requested
    pub intervals: Option<Vec<(f64, f64)>>,
    /// Confidence level of the intervals
    pub confidence_level: Option<f64>,
}

/// Unchecked wire form of [`ForecastResult`]
#[derive(Deserialize)]
struct RawForecastResult {
    forecast_values: Vec<f64>,
    forecast_periods: Vec<i32>,
    intervals: Option<Vec<(f64, f64)>>,
    confidence_level: Option<f64>,
}

impl TryFrom<RawForecastResult> for ForecastResult {
    type Error = AnalysisError;

    fn try_from(raw: RawForecastResult) -> Result<Self> {
        let point = Self::new(raw.forecast_values, raw.forecast_periods)?;
        match (raw.intervals, raw.confidence_level) {
            (Some(intervals), Some(level)) => point.with_intervals(intervals, level),
            (None, None) => Ok(point),
            _ => Err(AnalysisError::ValidationError(
                "Intervals and confidence level must be given together".to_string(),
            )),
        }
    }
}

impl ForecastResult {
    /// Create a point forecast
    pub fn new(forecast_values: Vec<f64>, forecast_periods: Vec<i32>) -> Result<Self> {
        if forecast_values.len() != forecast_periods.len() {
            return Err(AnalysisError::ValidationError(format!(
                "Values length ({}) doesn't match periods length ({})",
                forecast_values.len(),
                forecast_periods.len()
            )));
        }

        Ok(Self {
            forecast_values,
            forecast_periods,
            intervals: None,
            confidence_level: None,
        })
    }

    /// Attach prediction intervals
    pub fn with_intervals(mut self, intervals: Vec<(f64, f64)>, level: f64) -> Result<Self> {
        if intervals.len() != self.forecast_values.len() {
            return Err(AnalysisError::ValidationError(format!(
                "Values length ({}) doesn't match intervals length ({})",
                self.forecast_values.len(),
                intervals.len()
            )));
        }
        self.intervals = Some(intervals);
        self.confidence_level = Some(level);
        Ok(self)
    }

    /// Number of forecast steps
    pub fn horizon(&self) -> usize {
        self.forecast_values.len()
    }

    /// Get the prediction intervals, if available
    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }

    /// Serialize the forecast to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// DataFrame with `Year` and `forecast`, plus `lower`/`upper` when
    /// intervals are present
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = vec![
            Series::new("Year", self.forecast_periods.clone()),
            Series::new("forecast", self.forecast_values.clone()),
        ];
        if let Some(intervals) = &self.intervals {
            let lower: Vec<f64> = intervals.iter().map(|(l, _)| *l).collect();
            let upper: Vec<f64> = intervals.iter().map(|(_, u)| *u).collect();
            columns.push(Series::new("lower", lower));
            columns.push(Series::new("upper", upper));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Model fitted to a series and ready to extrapolate it
pub trait FittedModel: Debug {
    /// Forecast the next `horizon` years after the fitted series
    fn forecast(&self, horizon: usize) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be fitted to a time series
pub trait ForecastModel: Debug + Clone {
    /// The type of fitted model produced
    type Fitted: FittedModel;

    /// Fit the model to a series
    fn fit(&self, series: &TimeSeries) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_forecast_result_lengths() {
        assert!(ForecastResult::new(vec![1.0, 2.0], vec![2022]).is_err());

        let result = ForecastResult::new(vec![1.0, 2.0], vec![2022, 2023]).unwrap();
        assert_eq!(result.horizon(), 2);
        assert!(result.intervals().is_none());
        assert!(result.clone().with_intervals(vec![(0.0, 2.0)], 0.95).is_err());
    }

    #[test]
    fn test_forecast_dataframe() {
        let result = ForecastResult::new(vec![1.0, 2.0], vec![2022, 2023])
            .unwrap()
            .with_intervals(vec![(0.5, 1.5), (1.0, 3.0)], 0.9)
            .unwrap();
        let df = result.to_dataframe().unwrap();

        assert_eq!(df.shape(), (2, 4));
        assert_eq!(
            df.get_column_names(),
            vec!["Year", "forecast", "lower", "upper"]
        );
    }

    #[test]
    fn test_forecast_json() {
        let result = ForecastResult::new(vec![21.5], vec![2022]).unwrap();
        let json = result.to_json().unwrap();

        assert!(json.contains("\"forecast_periods\":[2022]"));
        let back: ForecastResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_deserialized_forecast_is_validated() {
        let mismatched = r#"{"forecast_values":[1.0,2.0],"forecast_periods":[2022]}"#;
        assert!(serde_json::from_str::<ForecastResult>(mismatched).is_err());

        let short_intervals = r#"{"forecast_values":[1.0,2.0],"forecast_periods":[2022,2023],
            "intervals":[[0.0,2.0]],"confidence_level":0.9}"#;
        assert!(serde_json::from_str::<ForecastResult>(short_intervals).is_err());

        let no_level = r#"{"forecast_values":[1.0],"forecast_periods":[2022],"intervals":[[0.0,2.0]]}"#;
        assert!(serde_json::from_str::<ForecastResult>(no_level).is_err());

        let with_intervals = ForecastResult::new(vec![1.0], vec![2022])
            .unwrap()
            .with_intervals(vec![(0.0, 2.0)], 0.9)
            .unwrap();
        let back: ForecastResult = serde_json::from_str(&with_intervals.to_json().unwrap()).unwrap();
        assert_eq!(back, with_intervals);
    }
}
