//! # Climate Forecast
//!
//! Time-series analysis of yearly temperatures for a single calendar month.
//!
//! ## Features
//!
//! - Augmented Dickey-Fuller unit-root test with MacKinnon p-values and
//!   critical values
//! - Rolling mean and rolling sample standard deviation with explicit gaps
//! - ARIMA(p, d, q) estimation by conditional sum of squares, multi-step
//!   forecasts and prediction intervals
//! - Per-month summaries, forecast accuracy metrics and CSV import via polars
//!
//! Every analysis returns its result; nothing here prints or plots.
//!
//! ## Quick Start
//!
//! ```rust
//! use climate_forecast::data::SeriesProvider;
//! use climate_forecast::models::arima::{forecast, ArimaOrder};
//! use climate_forecast::rolling::rolling_stats;
//! use climate_forecast::stationarity::analyze;
//! use weather_data::{Month, MonthlyClimateGenerator};
//!
//! let table = MonthlyClimateGenerator::new(42).generate()?;
//! let january = table.month_series(Month::Jan)?;
//!
//! let adf = analyze(&january)?;
//! let rolling = rolling_stats(&january, 10)?;
//! let result = forecast(&january, ArimaOrder::new(1, 1, 1), 20)?;
//!
//! assert!((0.0..=1.0).contains(&adf.p_value));
//! assert_eq!(rolling.defined_means(), 93);
//! assert_eq!(result.forecast_periods[0], 2022);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod data;
pub mod eda;
pub mod error;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod rolling;
pub mod stationarity;

// Re-export commonly used types
pub use crate::config::AnalysisConfig;
pub use crate::data::{DataLoader, SeriesProvider, TimeSeries};
pub use crate::error::{AnalysisError, Result};
pub use crate::models::arima::{ArimaModel, ArimaOrder, FittedArima};
pub use crate::models::{FittedModel, ForecastModel, ForecastResult};
pub use crate::pipeline::{run_analysis, AnalysisReport};
pub use crate::rolling::{rolling_stats, RollingWindowResult};
pub use crate::stationarity::{LagSelection, StationarityResult};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
