//! Monthly climate table generation
//!
//! Produces one temperature per year for every calendar month:
//! `base(month) + trend(year) + noise`, where the trend rises linearly
//! from 0 to `trend_total` across the covered years and the noise is drawn
//! from N(0, `noise_std`).

use crate::{ProviderError, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar month, used as a column key of the climate table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// All months in calendar order
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Three-letter column label
    pub fn label(&self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    /// Full English name
    pub fn name(&self) -> &'static str {
        match self {
            Month::Jan => "January",
            Month::Feb => "February",
            Month::Mar => "March",
            Month::Apr => "April",
            Month::May => "May",
            Month::Jun => "June",
            Month::Jul => "July",
            Month::Aug => "August",
            Month::Sep => "September",
            Month::Oct => "October",
            Month::Nov => "November",
            Month::Dec => "December",
        }
    }

    /// Long-run base temperature in °C
    pub fn base_temperature(&self) -> f64 {
        match self {
            Month::Jan => 20.0,
            Month::Feb => 22.0,
            Month::Mar => 25.0,
            Month::Apr => 28.0,
            Month::May => 32.0,
            Month::Jun => 30.0,
            Month::Jul => 28.0,
            Month::Aug => 27.0,
            Month::Sep => 26.0,
            Month::Oct => 24.0,
            Month::Nov => 22.0,
            Month::Dec => 20.0,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Month {
    type Err = ProviderError;

    /// Accepts the three-letter label or the full name, in any case
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Month::ALL
            .iter()
            .copied()
            .find(|m| {
                wanted.eq_ignore_ascii_case(m.label()) || wanted.eq_ignore_ascii_case(m.name())
            })
            .ok_or_else(|| ProviderError::UnknownMonth(s.to_string()))
    }
}

/// Year-by-month temperature table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyClimateTable {
    years: Vec<i32>,
    columns: Vec<Vec<f64>>,
}

impl MonthlyClimateTable {
    /// Build a table from years and twelve month columns in calendar order
    pub fn new(years: Vec<i32>, columns: Vec<Vec<f64>>) -> Result<Self> {
        if columns.len() != Month::ALL.len() {
            return Err(ProviderError::InvalidParameter(format!(
                "Expected 12 month columns, got {}",
                columns.len()
            )));
        }
        if let Some(bad) = columns.iter().find(|c| c.len() != years.len()) {
            return Err(ProviderError::InvalidParameter(format!(
                "Month column has {} rows but there are {} years",
                bad.len(),
                years.len()
            )));
        }

        Ok(Self { years, columns })
    }

    /// Years covered, in increasing order
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Temperatures of one month, aligned with `years()`
    pub fn column(&self, month: Month) -> &[f64] {
        &self.columns[month.index()]
    }

    /// (year, temperature) pairs for one month
    pub fn series(&self, month: Month) -> Vec<(i32, f64)> {
        self.years
            .iter()
            .copied()
            .zip(self.column(month).iter().copied())
            .collect()
    }

    /// Number of years
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Serialize the table to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Seeded generator for [`MonthlyClimateTable`]
#[derive(Debug, Clone)]
pub struct MonthlyClimateGenerator {
    seed: u64,
    start_year: i32,
    end_year: i32,
    trend_total: f64,
    noise_std: f64,
}

impl MonthlyClimateGenerator {
    /// Generator for 1920..=2021 with a 1.5 °C trend and 1.5 °C noise
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            start_year: 1920,
            end_year: 2021,
            trend_total: 1.5,
            noise_std: 1.5,
        }
    }

    /// Set the inclusive year range
    pub fn with_years(mut self, start_year: i32, end_year: i32) -> Self {
        self.start_year = start_year;
        self.end_year = end_year;
        self
    }

    /// Set the total warming applied from the first to the last year
    pub fn with_trend(mut self, trend_total: f64) -> Self {
        self.trend_total = trend_total;
        self
    }

    /// Set the standard deviation of the yearly noise
    pub fn with_noise(mut self, noise_std: f64) -> Self {
        self.noise_std = noise_std;
        self
    }

    /// Generate the table
    pub fn generate(&self) -> Result<MonthlyClimateTable> {
        if self.end_year < self.start_year {
            return Err(ProviderError::InvalidRange(format!(
                "end year {} is before start year {}",
                self.end_year, self.start_year
            )));
        }
        if self.noise_std.is_nan() || self.noise_std < 0.0 || !self.trend_total.is_finite() {
            return Err(ProviderError::InvalidParameter(
                "Noise must be non-negative and trend finite".to_string(),
            ));
        }

        let years: Vec<i32> = (self.start_year..=self.end_year).collect();
        let n = years.len();
        let trend: Vec<f64> = (0..n)
            .map(|i| {
                if n > 1 {
                    self.trend_total * i as f64 / (n - 1) as f64
                } else {
                    0.0
                }
            })
            .collect();

        let noise = Normal::new(0.0, self.noise_std)
            .map_err(|e| ProviderError::Distribution(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let columns = Month::ALL
            .iter()
            .map(|month| {
                let base = month.base_temperature();
                trend
                    .iter()
                    .map(|t| base + t + noise.sample(&mut rng))
                    .collect()
            })
            .collect();

        debug!(
            "generated monthly climate table {}..={} (seed {})",
            self.start_year, self.end_year, self.seed
        );

        MonthlyClimateTable::new(years, columns)
    }
}
