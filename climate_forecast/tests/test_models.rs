use approx::assert_abs_diff_eq;
use climate_forecast::metrics::evaluate_holdout;
use climate_forecast::models::arima::{fit, forecast, ArimaModel, ArimaOrder};
use climate_forecast::{AnalysisError, FittedModel, ForecastModel, TimeSeries};
use rstest::rstest;
use weather_data::{Month, MonthlyClimateGenerator};

fn month_series(seed: u64, month: Month) -> TimeSeries {
    let table = MonthlyClimateGenerator::new(seed).generate().unwrap();
    TimeSeries::new(table.years().to_vec(), table.column(month).to_vec()).unwrap()
}

#[rstest]
#[case(ArimaOrder::new(0, 0, 0))]
#[case(ArimaOrder::new(1, 0, 0))]
#[case(ArimaOrder::new(0, 1, 1))]
#[case(ArimaOrder::new(1, 1, 1))]
#[case(ArimaOrder::new(2, 1, 0))]
fn test_forecast_shapes(#[case] order: ArimaOrder) {
    let series = month_series(42, Month::Jan);
    let result = forecast(&series, order, 12).unwrap();

    assert_eq!(result.forecast_values.len(), 12);
    assert_eq!(
        result.forecast_periods,
        (2022..2034).collect::<Vec<i32>>()
    );
    assert!(result.forecast_values.iter().all(|v| v.is_finite()));
}

#[test]
fn test_model_trait_matches_free_functions() {
    let series = month_series(9, Month::Jun);
    let model = ArimaModel::new(ArimaOrder::new(1, 0, 1));

    assert_eq!(ForecastModel::name(&model), "ARIMA(1,0,1)");
    let fitted = model.fit(&series).unwrap();
    assert_eq!(FittedModel::name(&fitted), "ARIMA(1,0,1)");
    assert_eq!(
        fitted.forecast(4).unwrap(),
        forecast(&series, ArimaOrder::new(1, 0, 1), 4).unwrap()
    );
}

#[test]
fn test_fitted_diagnostics() {
    let series = month_series(42, Month::Jan);
    let fitted = fit(&series, ArimaOrder::new(1, 1, 1)).unwrap();

    assert_eq!(fitted.ar_coefficients().len(), 1);
    assert_eq!(fitted.ma_coefficients().len(), 1);
    assert!(fitted.ar_coefficients()[0].abs() < 1.0);
    assert!(fitted.ma_coefficients()[0].abs() <= 1.0);
    assert!(fitted.intercept().is_none());
    assert_eq!(fitted.n_obs(), 100);
    assert_eq!(fitted.residuals().len(), 101);
    assert!(fitted.sigma2() > 0.0);
    assert!(fitted.aic() < fitted.bic());
}

#[test]
fn test_stationary_model_reverts_to_mean() {
    let series = month_series(3, Month::Oct);
    let fitted = fit(&series, ArimaOrder::new(1, 0, 0)).unwrap();
    let mean = fitted.intercept().unwrap();
    let result = fitted.forecast(200).unwrap();

    assert_abs_diff_eq!(result.forecast_values[199], mean, epsilon = 1e-6);
}

#[test]
fn test_interval_levels_nest() {
    let series = month_series(42, Month::Apr);
    let fitted = fit(&series, ArimaOrder::new(0, 1, 1)).unwrap();
    let narrow = fitted.forecast_with_intervals(6, 0.8).unwrap();
    let wide = fitted.forecast_with_intervals(6, 0.99).unwrap();

    assert_eq!(narrow.forecast_values, wide.forecast_values);
    for (n, w) in narrow.intervals().unwrap().iter().zip(wide.intervals().unwrap()) {
        assert!(w.0 < n.0);
        assert!(w.1 > n.1);
    }
}

#[test]
fn test_holdout_accuracy_is_reasonable() {
    let series = month_series(42, Month::Jan);
    let accuracy = evaluate_holdout(&ArimaModel::new(ArimaOrder::new(0, 1, 1)), &series, 20)
        .unwrap();

    // Noise has a standard deviation of 1.5 around a slow trend
    assert!(accuracy.rmse < 4.0);
    assert!(accuracy.mape < 20.0);
}

#[test]
fn test_error_kinds() {
    let short = TimeSeries::from_values(2000, vec![1.0, 2.0, 1.5]).unwrap();

    assert!(matches!(
        fit(&short, ArimaOrder::new(0, 3, 0)),
        Err(AnalysisError::InvalidParameter(_))
    ));
    assert!(matches!(
        fit(&short, ArimaOrder::new(1, 1, 1)),
        Err(AnalysisError::InsufficientData(_))
    ));
    assert!(matches!(
        fit(&TimeSeries::from_values(2000, vec![2.0; 30]).unwrap(), ArimaOrder::default()),
        Err(AnalysisError::ModelFit(_))
    ));
}
