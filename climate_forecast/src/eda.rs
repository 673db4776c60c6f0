//! Exploratory summaries of a climate table
//!
//! The numbers behind a per-month box plot and a month-by-month correlation
//! heat map.

use crate::error::{AnalysisError, Result};
use climate_math::descriptive::{mean, pearson, quantile, sample_std};
use serde::{Deserialize, Serialize};
use weather_data::{Month, MonthlyClimateTable};

/// Five-number summary plus mean and sample standard deviation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// `None` for a single value
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Describe a sample; quantiles interpolate linearly between order statistics
pub fn describe(values: &[f64]) -> Result<Summary> {
    if values.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "Cannot describe an empty sample".to_string(),
        ));
    }

    Ok(Summary {
        count: values.len(),
        mean: mean(values)?,
        std: if values.len() > 1 {
            Some(sample_std(values)?)
        } else {
            None
        },
        min: quantile(values, 0.0)?,
        q1: quantile(values, 0.25)?,
        median: quantile(values, 0.5)?,
        q3: quantile(values, 0.75)?,
        max: quantile(values, 1.0)?,
    })
}

/// Summary of every month of a climate table, in calendar order
pub fn describe_months(table: &MonthlyClimateTable) -> Result<Vec<(Month, Summary)>> {
    Month::ALL
        .iter()
        .map(|&month| -> Result<(Month, Summary)> {
            Ok((month, describe(table.column(month))?))
        })
        .collect()
}

/// Pearson correlation between every pair of columns
///
/// Diagonal entries are exactly 1. Columns must share a length.
pub fn correlation_matrix(columns: &[&[f64]]) -> Result<Vec<Vec<f64>>> {
    let k = columns.len();
    let mut matrix = vec![vec![1.0; k]; k];
    for i in 0..k {
        for j in (i + 1)..k {
            let r = pearson(columns[i], columns[j])?;
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    Ok(matrix)
}

/// Month-by-month correlation matrix of a climate table
pub fn month_correlations(table: &MonthlyClimateTable) -> Result<Vec<Vec<f64>>> {
    let columns: Vec<&[f64]> = Month::ALL.iter().map(|&m| table.column(m)).collect();
    correlation_matrix(&columns)
}
