//! Layered dashboard settings
//!
//! Sources, lowest priority first: built-in defaults, the settings file,
//! `FORECAST_INSIGHT_*` environment variables. Command line flags are
//! applied on top by the caller.

use config::{Config, Environment, File};
use forecast_insight::metrics::validate_threshold;
use forecast_insight::{InsightError, MetricsEngine};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "dashboard";
/// Prefix of environment overrides, e.g. `FORECAST_INSIGHT_ANALYSIS__TOP_K=10`
pub const ENV_PREFIX: &str = "FORECAST_INSIGHT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// The root settings structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub data: DataSettings,
    pub analysis: AnalysisSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// Input files
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataSettings {
    /// Forecast table with `ds`, `forecast` and optional `actual` columns
    pub forecast_csv: PathBuf,
    /// Precomputed forecast plot image
    pub forecast_plot: PathBuf,
}

/// Parameters of the metrics
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisSettings {
    /// Anomaly threshold in standard deviations, between 1.0 and 3.0
    pub anomaly_threshold: f64,
    pub insight_window: usize,
    pub volatility_window: usize,
    pub top_k: usize,
    /// Rows shown in the data preview
    pub preview_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputSettings {
    /// Where the insight report is written
    pub report_dir: PathBuf,
    /// Where chart data is exported
    pub export_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive, `RUST_LOG` takes precedence
    pub filter: String,
}

impl Settings {
    /// Load settings from `path`, or from `dashboard.toml` if it exists
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("data.forecast_csv", "lstm_forecast.csv")?
            .set_default("data.forecast_plot", "lstm_forecast_plot.png")?
            .set_default("analysis.anomaly_threshold", 2.0)?
            .set_default("analysis.insight_window", 30_i64)?
            .set_default("analysis.volatility_window", 7_i64)?
            .set_default("analysis.top_k", 5_i64)?
            .set_default("analysis.preview_rows", 10_i64)?
            .set_default("output.report_dir", ".")?
            .set_default("output.export_dir", "chart_data")?
            .set_default("logging.filter", "info")?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check every value against the domain the metrics accept
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;

        validate_threshold(analysis.anomaly_threshold)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        if analysis.insight_window == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.insight_window must be at least 1".to_string(),
            ));
        }
        if analysis.volatility_window < 2 {
            return Err(ConfigError::ValidationError(
                "analysis.volatility_window must be at least 2".to_string(),
            ));
        }
        if analysis.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.top_k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// A metrics engine configured from the analysis settings
    pub fn engine(&self) -> Result<MetricsEngine, InsightError> {
        MetricsEngine::new()
            .with_anomaly_threshold(self.analysis.anomaly_threshold)?
            .with_insight_window(self.analysis.insight_window)?
            .with_volatility_window(self.analysis.volatility_window)?
            .with_top_k(self.analysis.top_k)
    }
}
