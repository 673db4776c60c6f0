//! Metrics for evaluating forecast accuracy on held-out years

use crate::data::TimeSeries;
use crate::error::{AnalysisError, Result};
use crate::models::{FittedModel, ForecastModel};
use serde::{Deserialize, Serialize};

/// Forecast accuracy metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error, zero actuals skipped
    pub mape: f64,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

/// Compare forecast values against observed values
pub fn evaluate_forecast(forecast: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(AnalysisError::ValidationError(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = forecast.len() as f64;
    let errors: Vec<f64> = forecast
        .iter()
        .zip(actual)
        .map(|(f, a)| a - f)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e * e).sum::<f64>() / n;

    let percentage: Vec<f64> = actual
        .iter()
        .zip(&errors)
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, e)| e.abs() / a.abs() * 100.0)
        .collect();
    let mape = if percentage.is_empty() {
        0.0
    } else {
        percentage.iter().sum::<f64>() / percentage.len() as f64
    };

    let smape = actual
        .iter()
        .zip(forecast)
        .map(|(a, f)| {
            let scale = a.abs() + f.abs();
            if scale == 0.0 {
                0.0
            } else {
                200.0 * (a - f).abs() / scale
            }
        })
        .sum::<f64>()
        / n;

    Ok(ForecastAccuracy {
        mae,
        mse,
        rmse: mse.sqrt(),
        mape,
        smape,
    })
}

/// Fit `model` on all but the last `holdout` years and score its forecast
/// of those years
pub fn evaluate_holdout<M: ForecastModel>(
    model: &M,
    series: &TimeSeries,
    holdout: usize,
) -> Result<ForecastAccuracy> {
    let (train, test) = series.split_tail(holdout)?;
    let forecast = model.fit(&train)?.forecast(holdout)?;
    evaluate_forecast(&forecast.forecast_values, test.values())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::arima::{ArimaModel, ArimaOrder};
    use approx::assert_relative_eq;

    #[test]
    fn test_evaluate_forecast() {
        let forecast = [10.0, 20.0, 30.0];
        let actual = [12.0, 18.0, 30.0];
        let accuracy = evaluate_forecast(&forecast, &actual).unwrap();

        assert_relative_eq!(accuracy.mae, 4.0 / 3.0);
        assert_relative_eq!(accuracy.mse, 8.0 / 3.0);
        assert_relative_eq!(accuracy.rmse, (8.0f64 / 3.0).sqrt());
        assert_relative_eq!(
            accuracy.mape,
            (2.0 / 12.0 + 2.0 / 18.0) * 100.0 / 3.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            accuracy.smape,
            (200.0 * 2.0 / 22.0 + 200.0 * 2.0 / 38.0) / 3.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_actuals_are_skipped_in_mape() {
        let accuracy = evaluate_forecast(&[1.0, 11.0], &[0.0, 10.0]).unwrap();
        assert_relative_eq!(accuracy.mape, 10.0);
    }

    #[test]
    fn test_mismatched_lengths() {
        assert!(matches!(
            evaluate_forecast(&[1.0, 2.0], &[1.0]),
            Err(AnalysisError::ValidationError(_))
        ));
        assert!(evaluate_forecast(&[], &[]).is_err());
    }

    #[test]
    fn test_holdout_of_random_walk() {
        let values = vec![5.0, 6.0, 5.5, 7.0, 6.5, 8.0, 7.5, 9.0];
        let series = TimeSeries::from_values(2000, values).unwrap();
        let model = ArimaModel::new(ArimaOrder::new(0, 1, 0));
        let accuracy = evaluate_holdout(&model, &series, 2).unwrap();

        // Both held-out years are forecast at the last training value 8.0
        assert_relative_eq!(accuracy.mae, (0.5 + 1.0) / 2.0);
    }
}
