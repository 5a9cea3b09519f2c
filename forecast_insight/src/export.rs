//! CSV export of the series behind each dashboard chart

use crate::data::{ForecastRow, ForecastTable};
use crate::engine::DashboardReport;
use crate::error::Result;
use crate::utils::YearMonth;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const FILTERED_FILE: &str = "filtered_forecast.csv";
pub const ANOMALIES_FILE: &str = "anomalies.csv";
pub const MONTHLY_FILE: &str = "monthly_average.csv";
pub const RANKINGS_FILE: &str = "top_bottom.csv";
pub const VOLATILITY_FILE: &str = "rolling_volatility.csv";

/// A row in the loader's own file layout
#[derive(Debug, Serialize)]
struct SeriesRecord {
    ds: NaiveDate,
    forecast: f64,
    actual: Option<f64>,
}

impl From<&ForecastRow> for SeriesRecord {
    fn from(row: &ForecastRow) -> Self {
        Self {
            ds: row.date,
            forecast: row.forecast,
            actual: row.actual,
        }
    }
}

#[derive(Debug, Serialize)]
struct AnomalyRecord {
    ds: NaiveDate,
    forecast: f64,
    /// Distance from the mean in standard deviations
    z_score: Option<f64>,
}

#[derive(Debug, Serialize)]
struct MonthlyRecord {
    month: YearMonth,
    avg_forecast: f64,
    days: usize,
}

#[derive(Debug, Serialize)]
struct RankingRecord {
    group: &'static str,
    rank: usize,
    ds: NaiveDate,
    forecast: f64,
}

#[derive(Debug, Serialize)]
struct VolatilityRecord {
    ds: NaiveDate,
    rolling_std: Option<f64>,
}

fn write_records<R: Serialize>(path: &Path, records: impl IntoIterator<Item = R>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a table as `ds,forecast,actual` CSV, readable by the loader
pub fn write_table<P: AsRef<Path>>(table: &ForecastTable, path: P) -> Result<()> {
    write_records(path.as_ref(), table.rows().iter().map(SeriesRecord::from))
}

/// Write one CSV per chart into `dir` and return the written paths
pub fn export_chart_data<P: AsRef<Path>>(report: &DashboardReport, dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let filtered = dir.join(FILTERED_FILE);
    write_records(&filtered, report.filtered.iter().map(SeriesRecord::from))?;

    let scan = &report.anomalies;
    let anomalies = dir.join(ANOMALIES_FILE);
    write_records(
        &anomalies,
        scan.anomalies.iter().map(|row| AnomalyRecord {
            ds: row.date,
            forecast: row.forecast,
            z_score: scan
                .std_dev
                .filter(|std_dev| *std_dev > 0.0)
                .map(|std_dev| (row.forecast - scan.mean) / std_dev),
        }),
    )?;

    let monthly = dir.join(MONTHLY_FILE);
    write_records(
        &monthly,
        report.monthly.iter().map(|entry| MonthlyRecord {
            month: entry.month,
            avg_forecast: entry.avg_forecast,
            days: entry.days,
        }),
    )?;

    let rankings = dir.join(RANKINGS_FILE);
    let ranked = |group: &'static str, rows: &[ForecastRow]| -> Vec<RankingRecord> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| RankingRecord {
                group,
                rank: i + 1,
                ds: row.date,
                forecast: row.forecast,
            })
            .collect()
    };
    let mut ranking_records = ranked("top", &report.rankings.top);
    ranking_records.extend(ranked("bottom", &report.rankings.bottom));
    write_records(&rankings, ranking_records)?;

    let volatility = dir.join(VOLATILITY_FILE);
    write_records(
        &volatility,
        report.volatility.iter().map(|point| VolatilityRecord {
            ds: point.date,
            rolling_std: point.value,
        }),
    )?;

    let written = vec![filtered, anomalies, monthly, rankings, volatility];
    info!(dir = %dir.display(), files = written.len(), "Exported chart data");
    Ok(written)
}
