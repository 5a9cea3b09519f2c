//! Error types for the forecast_insight crate

use insight_math::MathError;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the forecast_insight crate
#[derive(Debug, Error)]
pub enum InsightError {
    /// An input file (forecast table or plot image) does not exist
    #[error("Missing input: {}", .0.display())]
    MissingInput(PathBuf),

    /// Unparseable dates or numbers, or a table that breaks its invariants
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The table holds no rows
    #[error("No data: the forecast table is empty")]
    NoData,

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error while writing CSV exports
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error while serializing a report
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from the series math crate
    #[error("Math error: {0}")]
    MathError(#[from] MathError),
}

/// Coarse classification of an error, used to choose how a failure is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingInput,
    InvalidData,
    NoData,
    InvalidParameter,
    Io,
}

impl InsightError {
    /// Classify the error
    pub fn kind(&self) -> FailureKind {
        match self {
            InsightError::MissingInput(_) => FailureKind::MissingInput,
            InsightError::InvalidData(_) | InsightError::PolarsError(_) => FailureKind::InvalidData,
            InsightError::NoData | InsightError::MathError(MathError::InsufficientData(_)) => {
                FailureKind::NoData
            }
            InsightError::InvalidParameter(_) | InsightError::MathError(MathError::InvalidInput(_)) => {
                FailureKind::InvalidParameter
            }
            InsightError::IoError(_) | InsightError::CsvError(_) | InsightError::JsonError(_) => {
                FailureKind::Io
            }
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, InsightError>;

impl From<PolarsError> for InsightError {
    fn from(err: PolarsError) -> Self {
        InsightError::PolarsError(err.to_string())
    }
}
