//! Analysis settings
//!
//! Every field has a default, so a JSON file only needs the keys it changes:
//!
//! ```json
//! { "window": 5, "order": { "p": 2, "d": 1, "q": 0 }, "lag_selection": "bic" }
//! ```

use crate::error::{AnalysisError, Result};
use crate::models::arima::ArimaOrder;
use crate::stationarity::LagSelection;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use weather_data::Month;

/// Settings shared by the three analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Month whose yearly series is analysed
    pub month: Month,
    /// Rolling window size
    pub window: usize,
    /// ARIMA orders
    pub order: ArimaOrder,
    /// Number of years to forecast
    pub horizon: usize,
    /// Lag policy of the unit-root test
    pub lag_selection: LagSelection,
    /// Confidence level of the prediction intervals
    pub confidence_level: f64,
    /// Score a forecast of the last `horizon` years fitted on the rest
    pub holdout: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            month: Month::Jan,
            window: 10,
            order: ArimaOrder::default(),
            horizon: 20,
            lag_selection: LagSelection::Aic,
            confidence_level: 0.95,
            holdout: true,
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents).map_err(|e| match e {
            AnalysisError::Json(err) => AnalysisError::InvalidParameter(format!(
                "Invalid configuration file {}: {}",
                path.display(),
                err
            )),
            other => other,
        })
    }

    /// Serialize the configuration to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check settings that do not depend on the series
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(AnalysisError::InvalidWindow(
                "Window must be at least 1".to_string(),
            ));
        }
        if self.horizon == 0 {
            return Err(AnalysisError::InvalidParameter(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "Confidence level must be between 0 and 1, got {}",
                self.confidence_level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.window, 10);
        assert_eq!(config.order, ArimaOrder::new(1, 1, 1));
        assert_eq!(config.horizon, 20);
        assert_eq!(config.month, Month::Jan);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json(
            r#"{ "window": 5, "order": { "p": 2, "d": 1, "q": 0 }, "lag_selection": "bic" }"#,
        )
        .unwrap();

        assert_eq!(config.window, 5);
        assert_eq!(config.order, ArimaOrder::new(2, 1, 0));
        assert_eq!(config.lag_selection, LagSelection::Bic);
        assert_eq!(config.horizon, 20);
    }

    #[test]
    fn test_fixed_lag_json() {
        let config = AnalysisConfig::from_json(r#"{ "lag_selection": { "fixed": 3 } }"#).unwrap();
        assert_eq!(config.lag_selection, LagSelection::Fixed(3));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            AnalysisConfig::from_json(r#"{ "horizon": 0 }"#),
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json(r#"{ "window": 0 }"#),
            Err(AnalysisError::InvalidWindow(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json(r#"{ "confidence_level": 1.0 }"#),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let config = AnalysisConfig {
            month: Month::Jul,
            horizon: 5,
            ..AnalysisConfig::default()
        };
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();

        assert_eq!(AnalysisConfig::from_file(file.path()).unwrap(), config);
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        assert!(matches!(
            AnalysisConfig::from_file(file.path()),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }
}
