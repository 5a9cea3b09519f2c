//! # Forecast Insight
//!
//! Descriptive analytics over a precomputed sales forecast table.
//!
//! ## Features
//!
//! - Loading `ds,forecast[,actual]` tables from CSV or Parquet
//! - Summary statistics and mean absolute error against observed values
//! - Trend insight over the most recent rows, with a downloadable text report
//! - Threshold-based anomaly detection
//! - Monthly averages, top/bottom rankings and rolling volatility
//! - CSV export of every chart series
//!
//! ## Date ranges
//!
//! The date-range filter selects the rows of the primary chart only. Anomalies,
//! monthly averages, rankings and volatility are always computed over the full
//! table.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use forecast_insight::{DataLoader, DateRange, MetricsEngine};
//!
//! let table = DataLoader::from_csv("lstm_forecast.csv")?;
//! let engine = MetricsEngine::new().with_anomaly_threshold(2.5)?;
//!
//! let range = DateRange::covering(&table).ok_or(forecast_insight::InsightError::NoData)?;
//! let report = engine.analyze(&table, range)?;
//!
//! println!("{}", report.summary);
//! println!("{}", report.insight.text);
//! # Ok::<(), forecast_insight::InsightError>(())
//! ```

pub mod data;
pub mod engine;
pub mod error;
pub mod export;
pub mod metrics;
pub mod report;
pub mod sample;
pub mod utils;
pub mod volatility;

// Re-export commonly used types
pub use crate::data::{DataLoader, ForecastRow, ForecastTable, PlotAsset};
pub use crate::engine::{DashboardReport, DateRange, MetricsEngine};
pub use crate::error::{FailureKind, InsightError};
pub use crate::metrics::{AnomalyScan, ForecastSummary, Insight, MonthlyAverage, Rankings, Trend};
pub use crate::report::InsightDownload;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
