//! Time series data handling for climate analysis

use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use weather_data::{Month, MonthlyClimateTable};

/// Yearly observations of a single quantity, e.g. January temperatures
///
/// Periods are strictly increasing years; gaps between years are allowed.
/// Values are finite. A series always holds at least one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSeries")]
pub struct TimeSeries {
    periods: Vec<i32>,
    values: Vec<f64>,
}

/// Unchecked wire form of [`TimeSeries`]
#[derive(Deserialize)]
struct RawTimeSeries {
    periods: Vec<i32>,
    values: Vec<f64>,
}

impl TryFrom<RawTimeSeries> for TimeSeries {
    type Error = AnalysisError;

    fn try_from(raw: RawTimeSeries) -> Result<Self> {
        Self::new(raw.periods, raw.values)
    }
}

impl TimeSeries {
    /// Create a series from aligned periods and values
    pub fn new(periods: Vec<i32>, values: Vec<f64>) -> Result<Self> {
        if periods.is_empty() {
            return Err(AnalysisError::DataError(
                "Empty time series data".to_string(),
            ));
        }
        if periods.len() != values.len() {
            return Err(AnalysisError::DataError(format!(
                "Periods length ({}) doesn't match values length ({})",
                periods.len(),
                values.len()
            )));
        }
        if let Some(w) = periods.windows(2).find(|w| w[1] <= w[0]) {
            return Err(AnalysisError::DataError(format!(
                "Periods must be strictly increasing, found {} followed by {}",
                w[0], w[1]
            )));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(AnalysisError::DataError(format!(
                "Value for period {} is not a finite number",
                periods[i]
            )));
        }

        Ok(Self { periods, values })
    }

    /// Create a series of consecutive years starting at `start`
    pub fn from_values(start: i32, values: Vec<f64>) -> Result<Self> {
        let periods = (0..values.len())
            .map(|i| {
                i32::try_from(i)
                    .ok()
                    .and_then(|offset| start.checked_add(offset))
                    .ok_or_else(|| {
                        AnalysisError::DataError(format!(
                            "{} consecutive years from {} leave the representable years",
                            values.len(),
                            start
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(periods, values)
    }

    /// Create a series from (period, value) pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i32, f64)>,
    {
        let (periods, values) = pairs.into_iter().unzip();
        Self::new(periods, values)
    }

    /// Get the periods
    pub fn periods(&self) -> &[i32] {
        &self.periods
    }

    /// Get the values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; an empty series cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First period of the series
    pub fn first_period(&self) -> i32 {
        self.periods[0]
    }

    /// Last period of the series
    pub fn last_period(&self) -> i32 {
        self.periods[self.periods.len() - 1]
    }

    /// Sub-series `[start, end)` by position
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        if start >= end || end > self.len() {
            return Err(AnalysisError::DataError(format!(
                "Invalid slice {}..{} of a series with {} samples",
                start,
                end,
                self.len()
            )));
        }
        Ok(Self {
            periods: self.periods[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        })
    }

    /// Split off the last `holdout` samples
    pub fn split_tail(&self, holdout: usize) -> Result<(Self, Self)> {
        if holdout == 0 || holdout >= self.len() {
            return Err(AnalysisError::DataError(format!(
                "Cannot hold out {} of {} samples",
                holdout,
                self.len()
            )));
        }
        let cut = self.len() - holdout;
        Ok((self.slice(0, cut)?, self.slice(cut, self.len())?))
    }

    /// Two-column DataFrame (`Year`, `value_name`) for renderers
    pub fn to_dataframe(&self, value_name: &str) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Series::new("Year", self.periods.clone()),
            Series::new(value_name, self.values.clone()),
        ])?;
        Ok(df)
    }
}

/// Supplies a yearly series for a calendar month
pub trait SeriesProvider {
    /// Series of one month across all available years
    fn month_series(&self, month: Month) -> Result<TimeSeries>;
}

impl SeriesProvider for MonthlyClimateTable {
    fn month_series(&self, month: Month) -> Result<TimeSeries> {
        TimeSeries::new(self.years().to_vec(), self.column(month).to_vec())
    }
}

/// Data loader for year-by-month climate tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a table with a year column and twelve month columns from CSV
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<MonthlyClimateTable> {
        let df = Self::read_csv(path)?;
        Self::from_dataframe(&df)
    }

    /// Load a single month's series from a CSV file
    ///
    /// Only the year column and the requested month column need to exist.
    pub fn series_from_csv<P: AsRef<Path>>(path: P, month: Month) -> Result<TimeSeries> {
        let df = Self::read_csv(path)?;
        let year_column = Self::detect_year_column(&df)?;
        let month_column = Self::detect_month_columns(&df)
            .into_iter()
            .find(|(m, _)| *m == month)
            .map(|(_, name)| name)
            .ok_or_else(|| {
                AnalysisError::DataError(format!("No column for month {} found in data", month))
            })?;

        TimeSeries::new(
            Self::years(&df, &year_column)?,
            Self::temperatures(&df, &month_column)?,
        )
    }

    /// Convert an existing DataFrame into a climate table
    pub fn from_dataframe(df: &DataFrame) -> Result<MonthlyClimateTable> {
        let year_column = Self::detect_year_column(df)?;
        let month_columns = Self::detect_month_columns(df);

        let mut columns = Vec::with_capacity(Month::ALL.len());
        for month in Month::ALL {
            let name = month_columns
                .iter()
                .find(|(m, _)| *m == month)
                .map(|(_, name)| name)
                .ok_or_else(|| {
                    AnalysisError::DataError(format!(
                        "No column for month {} found in data",
                        month
                    ))
                })?;
            columns.push(Self::temperatures(df, name)?);
        }

        Ok(MonthlyClimateTable::new(Self::years(df, &year_column)?, columns)?)
    }

    /// DataFrame with a `Year` column and one column per month
    pub fn to_dataframe(table: &MonthlyClimateTable) -> Result<DataFrame> {
        let mut columns = vec![Series::new("Year", table.years().to_vec())];
        for month in Month::ALL {
            columns.push(Series::new(month.label(), table.column(month).to_vec()));
        }
        Ok(DataFrame::new(columns)?)
    }

    /// Write a climate table to CSV
    pub fn write_csv<P: AsRef<Path>>(table: &MonthlyClimateTable, path: P) -> Result<()> {
        let mut df = Self::to_dataframe(table)?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).has_header(true).finish(&mut df)?;
        Ok(())
    }

    fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;
        Ok(df)
    }

    /// Detect the year column in a DataFrame
    fn detect_year_column(df: &DataFrame) -> Result<String> {
        df.get_column_names()
            .into_iter()
            .find(|name| name.to_lowercase().contains("year"))
            .map(|name| name.to_string())
            .ok_or_else(|| AnalysisError::DataError("No year column found in data".to_string()))
    }

    /// Detect month columns by their labels
    fn detect_month_columns(df: &DataFrame) -> Vec<(Month, String)> {
        df.get_column_names()
            .into_iter()
            .filter_map(|name| name.parse::<Month>().ok().map(|m| (m, name.to_string())))
            .collect()
    }

    fn years(df: &DataFrame, name: &str) -> Result<Vec<i32>> {
        let column = df.column(name)?.cast(&DataType::Int32)?;
        column
            .i32()?
            .into_iter()
            .map(|v| {
                v.ok_or_else(|| AnalysisError::DataError(format!("Missing value in {}", name)))
            })
            .collect()
    }

    fn temperatures(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        column
            .f64()?
            .into_iter()
            .map(|v| {
                v.ok_or_else(|| AnalysisError::DataError(format!("Missing value in {}", name)))
            })
            .collect()
    }
}
