//! Command line interface

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Descriptive analytics for a precomputed sales forecast.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (TOML). Defaults to ./dashboard.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render every dashboard section to the terminal.
    Show(ShowArgs),
    /// Write the insight report (forecast_insight.txt).
    Report(ReportArgs),
    /// Write the series behind each chart as CSV files.
    Export(ExportArgs),
    /// Write a synthetic forecast table for trying the dashboard out.
    Generate(GenerateArgs),
}

/// Input file overrides
#[derive(Args, Debug, Default)]
pub struct DataArgs {
    /// Forecast table (CSV or Parquet).
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Metric parameter overrides
#[derive(Args, Debug, Default)]
pub struct AnalysisArgs {
    /// First date of the primary chart (format: YYYY-MM-DD). Defaults to the first row.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last date of the primary chart (format: YYYY-MM-DD). Defaults to the last row.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Anomaly threshold in standard deviations (1.0 to 3.0).
    #[arg(long)]
    pub threshold: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Precomputed forecast plot image.
    #[arg(long)]
    pub plot: Option<PathBuf>,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Directory the report is written to.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Directory the CSV files are written to.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output CSV path.
    #[arg(long)]
    pub out: PathBuf,

    /// First date of the series (format: YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Number of daily rows.
    #[arg(long, default_value_t = 90)]
    pub days: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Leave the `actual` column empty.
    #[arg(long)]
    pub no_actuals: bool,
}
