//! # Insight Math
//!
//! Numeric building blocks for forecast analytics.
//! This crate provides descriptive statistics over plain slices and
//! rolling-window indicators that can be fed one value at a time.

use thiserror::Error;

// Indicator modules
pub mod statistics;
pub mod volatility;

pub use statistics::{max, mean, min, sample_std_dev};
pub use volatility::RollingStdDev;

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
