//! Hourly city weather readings
//!
//! A day of observations taken every three hours. Each city has a base
//! temperature; readings scatter uniformly around it.

use crate::{round1, ProviderError, Result};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// City a snapshot is generated for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct City(String);

impl City {
    /// Cities with a known base temperature
    pub const KNOWN: [&'static str; 5] = ["London", "India", "Canada", "Paris", "Germany"];

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Base temperature in °C; cities without a known base use 15
    pub fn base_temperature(&self) -> f64 {
        match self.0.as_str() {
            "London" => 10.0,
            "India" => 15.0,
            "Canada" => 20.0,
            "Paris" => 12.0,
            "Germany" => 18.0,
            _ => 15.0,
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sky condition of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    PartlyCloudy,
    Cloudy,
    Sunny,
    LightRain,
    Overcast,
    ClearSky,
}

impl Condition {
    pub const ALL: [Condition; 6] = [
        Condition::PartlyCloudy,
        Condition::Cloudy,
        Condition::Sunny,
        Condition::LightRain,
        Condition::Overcast,
        Condition::ClearSky,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Condition::PartlyCloudy => "Partly Cloudy",
            Condition::Cloudy => "Cloudy",
            Condition::Sunny => "Sunny",
            Condition::LightRain => "Light Rain",
            Condition::Overcast => "Overcast",
            Condition::ClearSky => "Clear Sky",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Observation time
    pub timestamp: DateTime<Utc>,
    /// Air temperature in °C
    pub temperature: f64,
    /// Apparent temperature in °C
    pub feels_like: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Sky condition
    pub condition: Condition,
}

/// Headline figures for a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInsights {
    pub average_temperature: f64,
    pub max_wind_speed: f64,
    pub dominant_condition: Condition,
}

/// Readings for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: City,
    pub readings: Vec<WeatherReading>,
}

impl WeatherSnapshot {
    /// Average temperature, strongest wind and most frequent condition.
    ///
    /// Ties between equally frequent conditions go to the alphabetically
    /// first label. Returns `None` for a snapshot without readings.
    pub fn insights(&self) -> Option<WeatherInsights> {
        if self.readings.is_empty() {
            return None;
        }

        let n = self.readings.len() as f64;
        let average_temperature = self.readings.iter().map(|r| r.temperature).sum::<f64>() / n;
        let max_wind_speed = self
            .readings
            .iter()
            .map(|r| r.wind_speed)
            .fold(f64::NEG_INFINITY, f64::max);

        let mut counts: HashMap<Condition, usize> = HashMap::new();
        for reading in &self.readings {
            *counts.entry(reading.condition).or_insert(0) += 1;
        }
        let dominant_condition = counts
            .into_iter()
            .max_by(|(ca, na), (cb, nb)| na.cmp(nb).then_with(|| cb.label().cmp(ca.label())))
            .map(|(c, _)| c)?;

        Some(WeatherInsights {
            average_temperature,
            max_wind_speed,
            dominant_condition,
        })
    }

    /// Serialize the snapshot to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Seeded generator for [`WeatherSnapshot`]
#[derive(Debug, Clone)]
pub struct HourlyWeatherGenerator {
    seed: u64,
    start: DateTime<Utc>,
    readings: usize,
    step: Duration,
}

impl HourlyWeatherGenerator {
    /// Eight readings, three hours apart, starting at `start`
    pub fn new(seed: u64, start: DateTime<Utc>) -> Self {
        Self {
            seed,
            start,
            readings: 8,
            step: Duration::hours(3),
        }
    }

    /// Change the number of readings and the spacing between them
    pub fn with_schedule(mut self, readings: usize, step: Duration) -> Result<Self> {
        if readings == 0 {
            return Err(ProviderError::InvalidParameter(
                "At least one reading is required".to_string(),
            ));
        }
        if step <= Duration::zero() {
            return Err(ProviderError::InvalidParameter(
                "Reading interval must be positive".to_string(),
            ));
        }
        self.readings = readings;
        self.step = step;
        Ok(self)
    }

    /// Generate readings for `city`
    pub fn generate(&self, city: &City) -> WeatherSnapshot {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let base = city.base_temperature();

        let readings = (0..self.readings)
            .map(|i| {
                let variation: f64 = rng.gen_range(-3.0..3.0);
                let humidity: f64 = rng.gen_range(50.0..80.0);
                let wind: f64 = rng.gen_range(2.0..10.0);
                let condition = *Condition::ALL
                    .choose(&mut rng)
                    .unwrap_or(&Condition::Cloudy);

                WeatherReading {
                    timestamp: self.start + self.step * i as i32,
                    temperature: round1(base + variation),
                    feels_like: round1(base + variation - 1.0),
                    humidity: round1(humidity),
                    wind_speed: round1(wind),
                    condition,
                }
            })
            .collect();

        WeatherSnapshot {
            city: city.clone(),
            readings,
        }
    }
}
