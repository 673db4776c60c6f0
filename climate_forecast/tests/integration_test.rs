use climate_forecast::models::arima::{forecast, ArimaOrder};
use climate_forecast::pipeline::{run_analysis, run_for_provider};
use climate_forecast::rolling::rolling_stats;
use climate_forecast::stationarity::analyze;
use climate_forecast::{AnalysisConfig, AnalysisError, SeriesProvider, TimeSeries};
use pretty_assertions::assert_eq;
use weather_data::{Month, MonthlyClimateGenerator};

fn january() -> TimeSeries {
    MonthlyClimateGenerator::new(42)
        .generate()
        .unwrap()
        .month_series(Month::Jan)
        .unwrap()
}

#[test]
fn test_january_end_to_end() {
    let series = january();
    assert_eq!(series.len(), 102);
    assert_eq!(series.first_period(), 1920);
    assert_eq!(series.last_period(), 2021);

    // 1. Stationarity diagnosis
    let adf = analyze(&series).unwrap();
    assert!(adf.p_value.is_finite());
    assert!((0.0..=1.0).contains(&adf.p_value));
    let labels: Vec<&str> = adf.critical_values.keys().map(|k| k.as_str()).collect();
    assert_eq!(labels.len(), 3);
    for label in ["1%", "5%", "10%"] {
        assert!(labels.contains(&label));
    }

    // 2. Rolling statistics: the first nine years lack a full window
    let rolling = rolling_stats(&series, 10).unwrap();
    assert_eq!(rolling.rolling_mean.len(), 102);
    assert_eq!(rolling.defined_means(), 93);
    assert!(rolling.rolling_mean[..9].iter().all(Option::is_none));
    assert!(rolling.rolling_std[9..]
        .iter()
        .all(|v| v.map_or(false, f64::is_finite)));

    // 3. Forecast the next twenty years
    let result = forecast(&series, ArimaOrder::new(1, 1, 1), 20).unwrap();
    assert_eq!(result.forecast_values.len(), 20);
    assert_eq!(result.forecast_periods.len(), 20);
    assert_eq!(result.forecast_periods[0], 2022);
    assert_eq!(result.forecast_periods[19], 2041);
    assert!(result.forecast_values.iter().all(|v| v.is_finite()));
}

#[test]
fn test_analyses_are_idempotent() {
    let series = january();

    assert_eq!(analyze(&series).unwrap(), analyze(&series).unwrap());
    assert_eq!(
        rolling_stats(&series, 10).unwrap(),
        rolling_stats(&series, 10).unwrap()
    );
    assert_eq!(
        forecast(&series, ArimaOrder::default(), 20).unwrap(),
        forecast(&series, ArimaOrder::default(), 20).unwrap()
    );
}

#[test]
fn test_boundary_failures() {
    let series = january();

    assert!(matches!(
        rolling_stats(&series, series.len() + 1),
        Err(AnalysisError::InvalidWindow(_))
    ));
    assert!(matches!(
        forecast(&series, ArimaOrder::default(), 0),
        Err(AnalysisError::InvalidParameter(_))
    ));
}

#[test]
fn test_default_pipeline_on_generated_table() {
    let table = MonthlyClimateGenerator::new(7).generate().unwrap();
    let report = run_for_provider(&table, &AnalysisConfig::default()).unwrap();

    assert!(report.stationarity.is_ok());
    assert_eq!(report.rolling.as_ref().unwrap().window, 10);

    let forecast = report.forecast.as_ref().unwrap();
    assert_eq!(forecast.horizon(), 20);
    assert_eq!(forecast.confidence_level, Some(0.95));
    assert!(report.holdout.is_some());
}

#[test]
fn test_pipeline_for_every_month() {
    let table = MonthlyClimateGenerator::new(11).generate().unwrap();
    let config = AnalysisConfig {
        order: ArimaOrder::new(0, 1, 1),
        horizon: 5,
        holdout: false,
        ..AnalysisConfig::default()
    };

    for month in Month::ALL {
        let series = table.month_series(month).unwrap();
        let report = run_analysis(&series, &AnalysisConfig { month, ..config.clone() });
        let forecast = report.forecast.unwrap();
        // Forecasts stay near the month's base temperature
        let base = month.base_temperature();
        assert!(forecast
            .forecast_values
            .iter()
            .all(|v| (v - base).abs() < 6.0));
    }
}
