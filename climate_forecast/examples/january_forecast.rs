use climate_forecast::data::SeriesProvider;
use climate_forecast::models::arima::{fit, ArimaOrder};
use climate_forecast::rolling::rolling_stats;
use climate_forecast::stationarity::analyze;
use weather_data::{Month, MonthlyClimateGenerator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let table = MonthlyClimateGenerator::new(42).generate()?;
    let january = table.month_series(Month::Jan)?;

    let adf = analyze(&january)?;
    println!("ADF Statistic: {:.4}", adf.statistic);
    println!("p-value: {:.4}", adf.p_value);
    for (label, value) in &adf.critical_values {
        println!("Critical Value ({}): {:.4}", label, value);
    }

    let rolling = rolling_stats(&january, 10)?;
    println!();
    println!("Year  Jan     Mean    Std");
    for (i, year) in rolling.periods.iter().enumerate().skip(rolling.window - 1) {
        println!(
            "{}  {:.2}  {:.2}  {:.2}",
            year,
            january.values()[i],
            rolling.rolling_mean[i].unwrap_or(f64::NAN),
            rolling.rolling_std[i].unwrap_or(f64::NAN)
        );
    }

    let fitted = fit(&january, ArimaOrder::new(1, 1, 1))?;
    println!();
    println!(
        "{}: phi = {:?}, theta = {:?}, sigma^2 = {:.4}, AIC = {:.2}",
        ArimaOrder::new(1, 1, 1),
        fitted.ar_coefficients(),
        fitted.ma_coefficients(),
        fitted.sigma2(),
        fitted.aic()
    );

    let forecast = fitted.forecast_with_intervals(20, 0.95)?;
    for (i, year) in forecast.forecast_periods.iter().enumerate() {
        let (lower, upper) = forecast.intervals().map_or((f64::NAN, f64::NAN), |iv| iv[i]);
        println!(
            "{}  {:.2}  ({:.2} .. {:.2})",
            year, forecast.forecast_values[i], lower, upper
        );
    }

    Ok(())
}
