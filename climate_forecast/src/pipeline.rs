//! Runs the analyses over one series and collects their outcomes
//!
//! The unit-root test, the rolling statistics and the forecast are
//! independent consumers of the same input. Each keeps its own `Result`, so a
//! failing forecast never hides a valid stationarity diagnosis.

use crate::config::AnalysisConfig;
use crate::data::{SeriesProvider, TimeSeries};
use crate::error::{AnalysisError, Result};
use crate::metrics::{evaluate_holdout, ForecastAccuracy};
use crate::models::arima::ArimaModel;
use crate::models::{ForecastModel, ForecastResult};
use crate::rolling::{rolling_stats, RollingWindowResult};
use crate::stationarity::{analyze_with, StationarityResult};
use log::{debug, info, warn};
use serde::Serialize;

/// Outcomes of one analysis run
#[derive(Debug)]
pub struct AnalysisReport {
    /// Settings the run used
    pub config: AnalysisConfig,
    /// Analysed series
    pub series: TimeSeries,
    pub stationarity: Result<StationarityResult>,
    pub rolling: Result<RollingWindowResult>,
    pub forecast: Result<ForecastResult>,
    /// Hold-out accuracy; `None` when disabled or the series is too short
    pub holdout: Option<Result<ForecastAccuracy>>,
}

/// Serialisable view of one outcome
#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Section<'a, T> {
    Ok(&'a T),
    Error(String),
}

impl<'a, T> From<&'a Result<T>> for Section<'a, T> {
    fn from(outcome: &'a Result<T>) -> Self {
        match outcome {
            Ok(value) => Section::Ok(value),
            Err(err) => Section::Error(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    config: &'a AnalysisConfig,
    series: &'a TimeSeries,
    stationarity: Section<'a, StationarityResult>,
    rolling: Section<'a, RollingWindowResult>,
    forecast: Section<'a, ForecastResult>,
    holdout: Option<Section<'a, ForecastAccuracy>>,
}

impl AnalysisReport {
    /// Whether every analysis that ran succeeded
    pub fn is_complete(&self) -> bool {
        self.errors().is_empty()
    }

    /// Failed analyses by name
    pub fn errors(&self) -> Vec<(&'static str, &AnalysisError)> {
        let mut errors = Vec::new();
        if let Err(e) = &self.stationarity {
            errors.push(("stationarity", e));
        }
        if let Err(e) = &self.rolling {
            errors.push(("rolling", e));
        }
        if let Err(e) = &self.forecast {
            errors.push(("forecast", e));
        }
        if let Some(Err(e)) = &self.holdout {
            errors.push(("holdout", e));
        }
        errors
    }

    /// Serialize the report; failed sections carry their error message
    pub fn to_json(&self) -> Result<String> {
        let view = ReportView {
            config: &self.config,
            series: &self.series,
            stationarity: (&self.stationarity).into(),
            rolling: (&self.rolling).into(),
            forecast: (&self.forecast).into(),
            holdout: self.holdout.as_ref().map(Section::from),
        };
        Ok(serde_json::to_string_pretty(&view)?)
    }
}

/// Run the three analyses, plus the optional hold-out check, on `series`
pub fn run_analysis(series: &TimeSeries, config: &AnalysisConfig) -> AnalysisReport {
    info!(
        "Analysing {} samples for {} ({}..={})",
        series.len(),
        config.month,
        series.first_period(),
        series.last_period()
    );

    let stationarity = analyze_with(series, config.lag_selection);
    let rolling = rolling_stats(series, config.window);

    let model = ArimaModel::new(config.order);
    let forecast = if config.horizon == 0 {
        Err(AnalysisError::InvalidParameter(
            "Forecast horizon must be at least 1".to_string(),
        ))
    } else {
        model.fit(series).and_then(|fitted| {
            fitted.forecast_with_intervals(config.horizon, config.confidence_level)
        })
    };

    let holdout = if config.holdout && config.horizon > 0 && series.len() >= 2 * config.horizon
    {
        Some(evaluate_holdout(&model, series, config.horizon))
    } else {
        if config.holdout {
            debug!(
                "Skipping hold-out check: {} samples for a horizon of {}",
                series.len(),
                config.horizon
            );
        }
        None
    };

    let report = AnalysisReport {
        config: config.clone(),
        series: series.clone(),
        stationarity,
        rolling,
        forecast,
        holdout,
    };
    for (name, err) in report.errors() {
        warn!("{} analysis failed: {}", name, err);
    }
    report
}

/// Fetch the configured month from `provider` and analyse it
pub fn run_for_provider<P: SeriesProvider + ?Sized>(
    provider: &P,
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    let series = provider.month_series(config.month)?;
    Ok(run_analysis(&series, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use weather_data::MonthlyClimateGenerator;

    #[test]
    fn test_failures_stay_independent() {
        let series =
            TimeSeries::from_values(2000, vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]).unwrap();
        let config = AnalysisConfig {
            window: 3,
            horizon: 0,
            ..AnalysisConfig::default()
        };
        let report = run_analysis(&series, &config);

        assert!(matches!(
            report.stationarity,
            Err(AnalysisError::InsufficientData(_))
        ));
        assert!(report.rolling.is_ok());
        assert!(matches!(
            report.forecast,
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(report.holdout.is_none());
        assert_eq!(report.errors().len(), 2);
    }

    #[test]
    fn test_report_json_marks_sections() {
        let table = MonthlyClimateGenerator::new(42).generate().unwrap();
        let config = AnalysisConfig {
            window: 200,
            ..AnalysisConfig::default()
        };
        let report = run_for_provider(&table, &config).unwrap();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert!(json["stationarity"]["ok"]["p_value"].is_number());
        assert!(json["rolling"]["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid window"));
        assert_eq!(
            json["forecast"]["ok"]["forecast_periods"][0],
            serde_json::json!(2022)
        );
    }
}
