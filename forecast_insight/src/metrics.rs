//! Descriptive metrics over a forecast table
//!
//! Every function is a pure computation over the table it is given. An empty
//! table yields [`InsightError::NoData`]; a missing `actual` value is never an
//! error, it only removes the row from accuracy metrics.

use crate::data::{ForecastRow, ForecastTable};
use crate::error::{InsightError, Result};
use crate::utils::{format_amount, YearMonth};
use chrono::NaiveDate;
use insight_math::{max, mean, min, sample_std_dev};
use serde::Serialize;
use statrs::statistics::{Data, OrderStatistics};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Number of trailing rows summarized by [`insight`]
pub const DEFAULT_INSIGHT_WINDOW: usize = 30;
/// Number of rows in each ranking
pub const DEFAULT_TOP_K: usize = 5;
/// Default anomaly threshold in standard deviations
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.0;
/// Smallest accepted anomaly threshold
pub const MIN_ANOMALY_THRESHOLD: f64 = 1.0;
/// Largest accepted anomaly threshold
pub const MAX_ANOMALY_THRESHOLD: f64 = 3.0;

/// Closing line of every insight
pub const RECOMMENDATION: &str =
    "Continue strategies for high-sale periods. Investigate causes of dips.";

/// Headline statistics of the whole table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    /// Number of rows
    pub count: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Largest forecast
    pub max: f64,
    /// Smallest forecast
    pub min: f64,
    pub mean: f64,
    pub median: f64,
    pub lower_quartile: f64,
    pub upper_quartile: f64,
    /// Sample standard deviation, undefined for a single row
    pub std_dev: Option<f64>,
    /// Mean absolute error over the rows that have an observed value
    pub mae: Option<f64>,
    /// Number of rows that contributed to `mae`
    pub actual_count: usize,
}

impl fmt::Display for ForecastSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forecast Summary:")?;
        writeln!(f, "  {:<24}{}", "Total Days:", self.count)?;
        writeln!(f, "  {:<24}{} to {}", "Period:", self.first_date, self.last_date)?;
        writeln!(f, "  {:<24}{}", "Max Forecasted Sales:", format_amount(self.max))?;
        writeln!(f, "  {:<24}{}", "Min Forecasted Sales:", format_amount(self.min))?;
        writeln!(f, "  {:<24}{}", "Mean Forecasted Sales:", format_amount(self.mean))?;
        writeln!(f, "  {:<24}{}", "Median:", format_amount(self.median))?;
        writeln!(
            f,
            "  {:<24}{} to {}",
            "Interquartile Range:",
            format_amount(self.lower_quartile),
            format_amount(self.upper_quartile)
        )?;
        if let Some(std_dev) = self.std_dev {
            writeln!(f, "  {:<24}{}", "Std Deviation:", format_amount(std_dev))?;
        }
        if let Some(mae) = self.mae {
            writeln!(f, "  {:<24}{}", "Mean Absolute Error:", format_amount(mae))?;
        }
        Ok(())
    }
}

/// Direction of the forecast between the first and last row of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    /// Compare the last value of a window against its first
    pub fn between(first: f64, last: f64) -> Self {
        if last > first {
            Trend::Increasing
        } else if last < first {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        };
        f.write_str(label)
    }
}

/// Summary of the most recent rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub trend: Trend,
    pub max: f64,
    pub min: f64,
    pub avg: f64,
    /// Number of rows the insight was computed over
    pub window_len: usize,
    /// Human readable paragraph, ending with the recommendation
    pub text: String,
}

/// Rows whose forecast deviates from the table mean by more than a threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyScan {
    /// Threshold in standard deviations
    pub threshold: f64,
    /// Mean of the whole forecast column
    pub mean: f64,
    /// Sample standard deviation of the whole forecast column
    pub std_dev: Option<f64>,
    /// Flagged rows in date order
    pub anomalies: Vec<ForecastRow>,
}

impl AnomalyScan {
    pub fn len(&self) -> usize {
        self.anomalies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }

    /// Whether the row on `date` was flagged
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.anomalies.iter().any(|row| row.date == date)
    }
}

/// Average forecast of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAverage {
    pub month: YearMonth,
    pub avg_forecast: f64,
    /// Number of rows in the month
    pub days: usize,
}

/// Highest and lowest rows by forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rankings {
    /// Largest forecasts first
    pub top: Vec<ForecastRow>,
    /// Smallest forecasts first
    pub bottom: Vec<ForecastRow>,
}

/// Check that an anomaly threshold lies in the accepted range
pub fn validate_threshold(threshold: f64) -> Result<f64> {
    if !(MIN_ANOMALY_THRESHOLD..=MAX_ANOMALY_THRESHOLD).contains(&threshold) {
        return Err(InsightError::InvalidParameter(format!(
            "Anomaly threshold must be between {} and {}, got {}",
            MIN_ANOMALY_THRESHOLD, MAX_ANOMALY_THRESHOLD, threshold
        )));
    }
    Ok(threshold)
}

/// Headline statistics of the table
pub fn summarize(table: &ForecastTable) -> Result<ForecastSummary> {
    let rows = table.non_empty_rows()?;
    let forecasts = table.forecasts();

    let errors: Vec<f64> = rows.iter().filter_map(ForecastRow::absolute_error).collect();
    let mae = mean(&errors);

    let mut distribution = Data::new(forecasts.clone());

    Ok(ForecastSummary {
        count: rows.len(),
        first_date: rows[0].date,
        last_date: rows[rows.len() - 1].date,
        max: max(&forecasts).ok_or(InsightError::NoData)?,
        min: min(&forecasts).ok_or(InsightError::NoData)?,
        mean: mean(&forecasts).ok_or(InsightError::NoData)?,
        median: distribution.quantile(0.5),
        lower_quartile: distribution.lower_quartile(),
        upper_quartile: distribution.upper_quartile(),
        std_dev: sample_std_dev(&forecasts),
        mae,
        actual_count: errors.len(),
    })
}

/// Trend and range of the last `window` rows
pub fn insight(table: &ForecastTable, window: usize) -> Result<Insight> {
    if window == 0 {
        return Err(InsightError::InvalidParameter(
            "Insight window must be at least 1".to_string(),
        ));
    }
    table.non_empty_rows()?;

    let recent = table.tail(window);
    let values: Vec<f64> = recent.iter().map(|row| row.forecast).collect();

    let trend = Trend::between(values[0], values[values.len() - 1]);
    let max = max(&values).ok_or(InsightError::NoData)?;
    let min = min(&values).ok_or(InsightError::NoData)?;
    let avg = mean(&values).ok_or(InsightError::NoData)?;

    debug!(%trend, window_len = values.len(), "Computed insight");

    Ok(Insight {
        trend,
        max,
        min,
        avg,
        window_len: values.len(),
        text: insight_text(trend, max, min, avg, values.len()),
    })
}

fn insight_text(trend: Trend, max: f64, min: f64, avg: f64, days: usize) -> String {
    format!(
        "The forecast shows a {} trend in the last {} days.\n\
         - Highest predicted sales: {:.2}\n\
         - Lowest predicted sales: {:.2}\n\
         - Average predicted sales: {:.2}\n\
         \n\
         Recommendation: {}\n",
        trend, days, max, min, avg, RECOMMENDATION
    )
}

/// Rows more than `threshold` standard deviations away from the table mean
///
/// Mean and deviation always come from the entire table.
pub fn detect_anomalies(table: &ForecastTable, threshold: f64) -> Result<AnomalyScan> {
    let threshold = validate_threshold(threshold)?;
    let rows = table.non_empty_rows()?;
    let forecasts = table.forecasts();

    let mean = mean(&forecasts).ok_or(InsightError::NoData)?;
    let std_dev = sample_std_dev(&forecasts);

    let anomalies: Vec<ForecastRow> = match std_dev {
        Some(std_dev) => rows
            .iter()
            .filter(|row| (row.forecast - mean).abs() > threshold * std_dev)
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    debug!(threshold, mean, ?std_dev, count = anomalies.len(), "Scanned for anomalies");

    Ok(AnomalyScan {
        threshold,
        mean,
        std_dev,
        anomalies,
    })
}

/// Average forecast per calendar month, in chronological order
pub fn monthly_average(table: &ForecastTable) -> Result<Vec<MonthlyAverage>> {
    let rows = table.non_empty_rows()?;

    let mut months: BTreeMap<YearMonth, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let entry = months.entry(YearMonth::of(row.date)).or_insert((0.0, 0));
        entry.0 += row.forecast;
        entry.1 += 1;
    }

    Ok(months
        .into_iter()
        .map(|(month, (sum, days))| MonthlyAverage {
            month,
            avg_forecast: sum / days as f64,
            days,
        })
        .collect())
}

/// The `k` highest and `k` lowest rows by forecast
///
/// Ties keep date order. Tables shorter than `k` return every row in both
/// lists.
pub fn top_bottom(table: &ForecastTable, k: usize) -> Result<Rankings> {
    if k == 0 {
        return Err(InsightError::InvalidParameter(
            "Ranking size must be at least 1".to_string(),
        ));
    }
    let rows = table.non_empty_rows()?;

    // sort_by is stable, equal forecasts stay in date order
    let mut top = rows.to_vec();
    top.sort_by(|a, b| b.forecast.total_cmp(&a.forecast));
    top.truncate(k);

    let mut bottom = rows.to_vec();
    bottom.sort_by(|a, b| a.forecast.total_cmp(&b.forecast));
    bottom.truncate(k);

    Ok(Rankings { top, bottom })
}
