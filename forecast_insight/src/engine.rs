//! One-pass computation of every dashboard section

use crate::data::{ForecastRow, ForecastTable, PlotAsset};
use crate::error::{InsightError, Result};
use crate::metrics::{
    self, AnomalyScan, ForecastSummary, Insight, MonthlyAverage, Rankings,
    DEFAULT_ANOMALY_THRESHOLD, DEFAULT_INSIGHT_WINDOW, DEFAULT_TOP_K,
};
use crate::volatility::{volatility_series, VolatilityPoint, DEFAULT_VOLATILITY_WINDOW};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Inclusive date range selecting the rows of the primary chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The full span of the table, `None` for an empty table
    pub fn covering(table: &ForecastTable) -> Option<Self> {
        Some(Self {
            start: table.first_date()?,
            end: table.last_date()?,
        })
    }

    /// Fill the unset bounds from the table span
    pub fn resolve(
        table: &ForecastTable,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self> {
        let full = Self::covering(table).ok_or(InsightError::NoData)?;
        Ok(Self {
            start: start.unwrap_or(full.start),
            end: end.unwrap_or(full.end),
        })
    }
}

/// Every derived value the dashboard shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub range: DateRange,
    /// Rows inside `range`, only used by the primary chart
    pub filtered: Vec<ForecastRow>,
    pub summary: ForecastSummary,
    pub insight: Insight,
    pub anomalies: AnomalyScan,
    pub monthly: Vec<MonthlyAverage>,
    pub rankings: Rankings,
    pub volatility: Vec<VolatilityPoint>,
    /// Precomputed plot image, `None` when it was not found
    pub plot: Option<PathBuf>,
}

impl DashboardReport {
    /// Attach the located plot image
    pub fn with_plot(mut self, plot: Option<&PlotAsset>) -> Self {
        self.plot = plot.map(|asset| asset.path().to_path_buf());
        self
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parameters of the metrics computations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsEngine {
    anomaly_threshold: f64,
    insight_window: usize,
    volatility_window: usize,
    top_k: usize,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self {
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
            insight_window: DEFAULT_INSIGHT_WINDOW,
            volatility_window: DEFAULT_VOLATILITY_WINDOW,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the anomaly threshold, in standard deviations
    pub fn with_anomaly_threshold(mut self, threshold: f64) -> Result<Self> {
        self.anomaly_threshold = metrics::validate_threshold(threshold)?;
        Ok(self)
    }

    pub fn with_insight_window(mut self, window: usize) -> Result<Self> {
        if window == 0 {
            return Err(InsightError::InvalidParameter(
                "Insight window must be at least 1".to_string(),
            ));
        }
        self.insight_window = window;
        Ok(self)
    }

    pub fn with_volatility_window(mut self, window: usize) -> Result<Self> {
        if window < 2 {
            return Err(InsightError::InvalidParameter(
                "Volatility window must be at least 2".to_string(),
            ));
        }
        self.volatility_window = window;
        Ok(self)
    }

    pub fn with_top_k(mut self, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(InsightError::InvalidParameter(
                "Ranking size must be at least 1".to_string(),
            ));
        }
        self.top_k = k;
        Ok(self)
    }

    pub fn anomaly_threshold(&self) -> f64 {
        self.anomaly_threshold
    }

    pub fn insight_window(&self) -> usize {
        self.insight_window
    }

    pub fn volatility_window(&self) -> usize {
        self.volatility_window
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Compute every section of the dashboard
    ///
    /// Only `filtered` honours the date range. All other sections are
    /// computed over the full table.
    pub fn analyze(&self, table: &ForecastTable, range: DateRange) -> Result<DashboardReport> {
        table.non_empty_rows()?;

        let filtered = table.filter_range(range.start, range.end);
        debug!(
            start = %range.start,
            end = %range.end,
            rows = filtered.len(),
            "Applied date range to primary chart"
        );

        let report = DashboardReport {
            range,
            filtered: filtered.rows().to_vec(),
            summary: metrics::summarize(table)?,
            insight: metrics::insight(table, self.insight_window)?,
            anomalies: metrics::detect_anomalies(table, self.anomaly_threshold)?,
            monthly: metrics::monthly_average(table)?,
            rankings: metrics::top_bottom(table, self.top_k)?,
            volatility: volatility_series(table, self.volatility_window)?,
            plot: None,
        };

        info!(
            rows = table.len(),
            anomalies = report.anomalies.len(),
            months = report.monthly.len(),
            trend = %report.insight.trend,
            "Computed dashboard metrics"
        );

        Ok(report)
    }
}
