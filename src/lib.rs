//! # Climate Owl
//!
//! Umbrella crate for the climate analysis workspace.
//!
//! - [`math`]: numeric kernels (rolling windows, least squares, simplex search)
//! - [`weather`]: seeded synthetic monthly and hourly weather
//! - [`forecast`]: stationarity test, rolling statistics and ARIMA forecasts
//!
//! ## Example
//!
//! ```
//! use climate_owl_workspace::forecast::{run_analysis, AnalysisConfig, SeriesProvider};
//! use climate_owl_workspace::weather::{Month, MonthlyClimateGenerator};
//!
//! let table = MonthlyClimateGenerator::new(42).generate().unwrap();
//! let january = table.month_series(Month::Jan).unwrap();
//! let report = run_analysis(&january, &AnalysisConfig::default());
//!
//! assert!(report.stationarity.is_ok());
//! assert_eq!(report.rolling.unwrap().rolling_mean.len(), 102);
//! ```

pub use climate_forecast as forecast;
pub use climate_math as math;
pub use weather_data as weather;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_paths() {
        let table = weather::MonthlyClimateGenerator::new(1)
            .with_years(2000, 2019)
            .generate()
            .unwrap();
        let series = forecast::SeriesProvider::month_series(&table, weather::Month::Aug).unwrap();
        let summary = forecast::eda::describe(series.values()).unwrap();

        assert_eq!(summary.count, 20);
        assert!(math::descriptive::mean(series.values()).unwrap() > 20.0);
    }
}
