use clap::Parser;
use climate_forecast::data::{DataLoader, SeriesProvider};
use climate_forecast::eda::describe;
use climate_forecast::models::arima::ArimaOrder;
use climate_forecast::pipeline::{run_analysis, AnalysisReport};
use climate_forecast::{AnalysisConfig, LagSelection};
use log::info;
use std::path::PathBuf;
use weather_data::{City, HourlyWeatherGenerator, Month, MonthlyClimateGenerator};

/// Stationarity, rolling statistics and ARIMA forecast for one month of a
/// yearly temperature table
#[derive(Parser, Debug)]
#[command(name = "climate_report")]
#[command(version)]
struct Cli {
    /// Seed of the synthetic climate table
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Month to analyse, e.g. Jan
    #[arg(long)]
    month: Option<Month>,

    /// Rolling window size
    #[arg(long)]
    window: Option<usize>,

    /// Years to forecast
    #[arg(long)]
    horizon: Option<usize>,

    /// ARIMA orders as p,d,q
    #[arg(long)]
    order: Option<ArimaOrder>,

    /// Unit-root lag policy: aic, bic or a lag count
    #[arg(long)]
    lag: Option<LagSelection>,

    /// Confidence level of the prediction intervals
    #[arg(long)]
    level: Option<f64>,

    /// Read the table from a CSV file instead of generating it
    #[arg(long)]
    csv: Option<PathBuf>,

    /// JSON file with analysis settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also print a day of hourly readings for this city
    #[arg(long)]
    city: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn analysis_config(&self) -> climate_forecast::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(month) = self.month {
            config.month = month;
        }
        if let Some(window) = self.window {
            config.window = window;
        }
        if let Some(horizon) = self.horizon {
            config.horizon = horizon;
        }
        if let Some(order) = self.order {
            config.order = order;
        }
        if let Some(lag) = self.lag {
            config.lag_selection = lag;
        }
        if let Some(level) = self.level {
            config.confidence_level = level;
        }
        Ok(config)
    }
}

fn print_report(report: &AnalysisReport) {
    let series = &report.series;
    println!(
        "{} temperatures, {}-{} ({} years)",
        report.config.month,
        series.first_period(),
        series.last_period(),
        series.len()
    );
    if let Ok(summary) = describe(series.values()) {
        println!(
            "  mean {:.2}  min {:.2}  median {:.2}  max {:.2}",
            summary.mean, summary.min, summary.median, summary.max
        );
    }
    println!();

    println!("Augmented Dickey-Fuller test");
    match &report.stationarity {
        Ok(adf) => {
            println!("  ADF statistic: {:.4}", adf.statistic);
            println!("  p-value:       {:.4}", adf.p_value);
            println!("  lags used:     {} ({} observations)", adf.used_lag, adf.n_obs);
            for (label, value) in &adf.critical_values {
                println!("  critical {:>4}: {:.4}", label, value);
            }
            let verdict = if adf.is_stationary(0.05) {
                "stationary"
            } else {
                "non-stationary"
            };
            println!("  series looks {} at the 5% level", verdict);
        }
        Err(e) => println!("  failed: {}", e),
    }
    println!();

    println!("Rolling statistics (window {})", report.config.window);
    match &report.rolling {
        Ok(rolling) => {
            let last = |values: &[Option<f64>]| {
                values
                    .last()
                    .copied()
                    .flatten()
                    .map_or_else(|| "n/a".to_string(), |v| format!("{:.3}", v))
            };
            println!("  defined entries: {}", rolling.defined_means());
            println!("  latest mean:     {}", last(&rolling.rolling_mean));
            println!("  latest std:      {}", last(&rolling.rolling_std));
        }
        Err(e) => println!("  failed: {}", e),
    }
    println!();

    println!("{} forecast", report.config.order);
    match &report.forecast {
        Ok(forecast) => {
            let intervals = forecast.intervals();
            for (i, (year, value)) in forecast
                .forecast_periods
                .iter()
                .zip(&forecast.forecast_values)
                .enumerate()
            {
                match intervals.map(|iv| iv[i]) {
                    Some((lower, upper)) => {
                        println!("  {}  {:>7.3}  [{:.3}, {:.3}]", year, value, lower, upper)
                    }
                    None => println!("  {}  {:>7.3}", year, value),
                }
            }
        }
        Err(e) => println!("  failed: {}", e),
    }

    if let Some(holdout) = &report.holdout {
        println!();
        println!("Hold-out check (last {} years)", report.config.horizon);
        match holdout {
            Ok(accuracy) => println!(
                "  MAE {:.3}  RMSE {:.3}  MAPE {:.2}%",
                accuracy.mae, accuracy.rmse, accuracy.mape
            ),
            Err(e) => println!("  failed: {}", e),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.analysis_config()?;

    let table = match &cli.csv {
        Some(path) => {
            info!("Loading climate table from {}", path.display());
            DataLoader::from_csv(path)?
        }
        None => MonthlyClimateGenerator::new(cli.seed).generate()?,
    };
    let series = table.month_series(config.month)?;
    let report = run_analysis(&series, &config);

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }

    if let Some(name) = &cli.city {
        let start = chrono::Utc::now();
        let snapshot = HourlyWeatherGenerator::new(cli.seed, start).generate(&City::new(name.as_str()));
        if cli.json {
            println!("{}", snapshot.to_json()?);
        } else if let Some(insights) = snapshot.insights() {
            println!();
            println!("Weather in {}", snapshot.city);
            for reading in &snapshot.readings {
                println!(
                    "  {}  {:>5.1}°C  feels {:>5.1}°C  {:>4.1}%  {:>4.1} m/s  {}",
                    reading.timestamp.format("%H:%M"),
                    reading.temperature,
                    reading.feels_like,
                    reading.humidity,
                    reading.wind_speed,
                    reading.condition
                );
            }
            println!(
                "  average {:.1}°C, strongest wind {:.1} m/s, mostly {}",
                insights.average_temperature, insights.max_wind_speed, insights.dominant_condition
            );
        }
    }

    Ok(())
}
