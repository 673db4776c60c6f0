//! Sliding-window accumulators
//!
//! Contains a fixed-size window over a stream of values that reports:
//! - Arithmetic mean of the window
//! - Sample standard deviation (n - 1 denominator) of the window

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Fixed-size sliding window over a stream of values
#[derive(Debug, Clone)]
pub struct RollingWindow {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl RollingWindow {
    /// Create a new window holding the last `period` values
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Push a new value, evicting the oldest one once the window is full
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Whether the window holds `period` values
    pub fn is_full(&self) -> bool {
        self.values.len() == self.period
    }

    /// Mean of the window
    pub fn mean(&self) -> Result<f64> {
        if !self.is_full() {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for rolling mean. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        // Recompute from the buffer instead of the running sum so that long
        // streams do not accumulate cancellation error.
        Ok(self.values.iter().sum::<f64>() / self.period as f64)
    }

    /// Sample standard deviation of the window
    pub fn sample_std(&self) -> Result<f64> {
        if self.period < 2 {
            return Err(MathError::InsufficientData(
                "Sample standard deviation needs a window of at least 2".to_string(),
            ));
        }

        let mean = self.mean()?;
        let variance = self
            .values
            .iter()
            .map(|&v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / (self.period - 1) as f64;

        Ok(variance.sqrt())
    }

    /// Running sum of the values currently held
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Get the window size
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the window, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}
