//! # Weather Data
//!
//! `weather_data` generates the synthetic inputs the climate analysis tools
//! work on. Every generator takes an explicit seed, so the same configuration
//! always yields the same readings.
//!
//! ## Providers
//!
//! - **Monthly climate table**: one temperature per year for each calendar
//!   month, built from a per-month base value, a slow warming trend and
//!   Gaussian noise
//! - **Hourly city readings**: a day of three-hourly observations for a city,
//!   with temperature, humidity, wind and sky condition
//!
//! ## Usage Example
//!
//! ```
//! use weather_data::{Month, MonthlyClimateGenerator};
//!
//! let table = MonthlyClimateGenerator::new(42).generate().unwrap();
//! assert_eq!(table.len(), 102);
//!
//! let january = table.series(Month::Jan);
//! assert_eq!(january.first().map(|(year, _)| *year), Some(1920));
//! ```

use thiserror::Error;

pub mod hourly;
pub mod monthly;

pub use hourly::{City, Condition, HourlyWeatherGenerator, WeatherInsights, WeatherReading, WeatherSnapshot};
pub use monthly::{Month, MonthlyClimateGenerator, MonthlyClimateTable};

/// Errors that can occur while generating synthetic weather
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid year range: {0}")]
    InvalidRange(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown month label: {0}")]
    UnknownMonth(String),

    #[error("Distribution error: {0}")]
    Distribution(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for weather generation
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Round to one decimal place, the precision readings are reported with
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round1() {
        assert_eq!(round1(12.345), 12.3);
        assert_eq!(round1(-2.36), -2.4);
        assert_eq!(round1(7.0), 7.0);
    }
}
