//! Error types for the climate_forecast crate

use climate_math::MathError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the climate_forecast crate
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Series too short for the requested test or lag structure
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Rolling window size incompatible with the series
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// Model estimation failed to converge or the input is degenerate
    #[error("Model fit error: {0}")]
    ModelFit(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to comparing forecasts against observations
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from numeric kernels
    #[error("Calculation error: {0}")]
    Calculation(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    Polars(String),

    /// Error from JSON encoding or decoding
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl From<PolarsError> for AnalysisError {
    fn from(err: PolarsError) -> Self {
        AnalysisError::Polars(err.to_string())
    }
}

impl From<weather_data::ProviderError> for AnalysisError {
    fn from(err: weather_data::ProviderError) -> Self {
        AnalysisError::DataError(err.to_string())
    }
}
