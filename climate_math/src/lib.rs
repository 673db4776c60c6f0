//! # Climate Math
//!
//! Numeric building blocks for the climate analysis crates.
//! This crate provides the small kernels the analysis pipeline is built on:
//! sliding-window accumulators, ordinary least squares with standard errors,
//! a Nelder-Mead simplex minimiser and a few descriptive statistics.

use thiserror::Error;

pub mod descriptive;
pub mod distribution;
pub mod optimize;
pub mod regression;
pub mod rolling;

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
