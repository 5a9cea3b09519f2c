//! Text rendering of the dashboard sections

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use forecast_insight::utils::format_amount;
use forecast_insight::volatility::peak_volatility;
use forecast_insight::{
    AnomalyScan, DashboardReport, FailureKind, ForecastRow, ForecastTable, InsightError,
    MonthlyAverage, PlotAsset, Rankings,
};
use std::io::{self, Write};

const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 60;
const MONTH_BAR_WIDTH: f64 = 30.0;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn section(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "== {} ==", title)
}

fn optional_amount(value: Option<f64>) -> String {
    value.map(format_amount).unwrap_or_else(|| "-".to_string())
}

/// Average `values` down to at most `width` buckets
fn downsample(values: &[f64], width: usize) -> Vec<f64> {
    if values.len() <= width || width == 0 {
        return values.to_vec();
    }

    (0..width)
        .map(|bucket| {
            let start = bucket * values.len() / width;
            let end = ((bucket + 1) * values.len() / width).max(start + 1);
            let slice = &values[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// One-line bar chart of a series
pub fn sparkline(values: &[f64]) -> String {
    let values = downsample(values, SPARK_WIDTH);
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    values
        .iter()
        .map(|value| {
            if span <= 0.0 || !span.is_finite() {
                SPARK_BARS[SPARK_BARS.len() / 2]
            } else {
                let level = ((value - lo) / span * (SPARK_BARS.len() - 1) as f64).round() as usize;
                SPARK_BARS[level.min(SPARK_BARS.len() - 1)]
            }
        })
        .collect()
}

/// Table of dated forecasts with their observed values
pub fn rows_table(rows: &[ForecastRow]) -> Table {
    let mut table = new_table(vec!["Date", "Forecast", "Actual"]);
    for row in rows {
        table.add_row(vec![
            row.date.to_string(),
            format_amount(row.forecast),
            optional_amount(row.actual),
        ]);
    }
    table
}

/// Plot location, or a warning when the image is missing
pub fn render_plot_status(
    out: &mut impl Write,
    plot: &Result<PlotAsset, InsightError>,
) -> io::Result<()> {
    section(out, "Forecast Plot")?;
    match plot {
        Ok(plot) => writeln!(out, "Forecast plot: {}", plot.path().display()),
        Err(_) => writeln!(out, "Warning: Forecast plot not found."),
    }
}

/// Error state shown instead of every metric section
pub fn render_unavailable(out: &mut impl Write, error: &InsightError) -> io::Result<()> {
    writeln!(out, "Error: Forecast data not available.")?;
    let hint = match error.kind() {
        FailureKind::MissingInput => "the forecast file does not exist",
        FailureKind::InvalidData => "the forecast file could not be parsed",
        FailureKind::NoData => "the forecast file has no rows",
        FailureKind::InvalidParameter => "a parameter is out of range",
        FailureKind::Io => "the forecast file could not be read",
    };
    writeln!(out, "Cause: {} ({})", hint, error)
}

pub fn render_preview(out: &mut impl Write, table: &ForecastTable, rows: usize) -> io::Result<()> {
    section(out, &format!("Forecast Data (Last {} rows)", rows))?;
    writeln!(out, "{}", rows_table(table.tail(rows)))
}

fn render_filtered(out: &mut impl Write, report: &DashboardReport) -> io::Result<()> {
    section(out, "Forecast (Filtered)")?;
    writeln!(
        out,
        "Range: {} to {} ({} rows)",
        report.range.start,
        report.range.end,
        report.filtered.len()
    )?;
    if report.filtered.is_empty() {
        return writeln!(out, "No rows in the selected date range.");
    }

    let forecasts: Vec<f64> = report.filtered.iter().map(|row| row.forecast).collect();
    writeln!(out, "Predicted: {}", sparkline(&forecasts))?;

    let actuals: Vec<f64> = report.filtered.iter().filter_map(|row| row.actual).collect();
    if !actuals.is_empty() {
        writeln!(out, "Actual:    {}", sparkline(&actuals))?;
    }
    Ok(())
}

fn render_anomalies(out: &mut impl Write, scan: &AnomalyScan) -> io::Result<()> {
    section(out, "Anomaly Detection")?;
    writeln!(
        out,
        "Detected {} anomalies (based on threshold: {:.1} std)",
        scan.len(),
        scan.threshold
    )?;
    if !scan.is_empty() {
        writeln!(out, "{}", rows_table(&scan.anomalies))?;
    }
    Ok(())
}

fn render_monthly(out: &mut impl Write, monthly: &[MonthlyAverage]) -> io::Result<()> {
    section(out, "Monthly Average Forecast")?;
    let peak = monthly
        .iter()
        .map(|entry| entry.avg_forecast.abs())
        .fold(0.0, f64::max);

    let mut table = new_table(vec!["Month", "Avg Sales", "Days", ""]);
    for entry in monthly {
        let width = if peak > 0.0 {
            (entry.avg_forecast.abs() / peak * MONTH_BAR_WIDTH).round() as usize
        } else {
            0
        };
        table.add_row(vec![
            entry.month.to_string(),
            format_amount(entry.avg_forecast),
            entry.days.to_string(),
            "█".repeat(width),
        ]);
    }
    writeln!(out, "{}", table)
}

fn render_rankings(out: &mut impl Write, rankings: &Rankings) -> io::Result<()> {
    section(out, &format!("Top {} Days", rankings.top.len()))?;
    writeln!(out, "{}", rows_table(&rankings.top))?;
    section(out, &format!("Bottom {} Days", rankings.bottom.len()))?;
    writeln!(out, "{}", rows_table(&rankings.bottom))
}

fn render_volatility(out: &mut impl Write, report: &DashboardReport) -> io::Result<()> {
    section(out, "Sales Volatility (Rolling Std Dev)")?;
    let defined: Vec<f64> = report.volatility.iter().filter_map(|point| point.value).collect();

    match peak_volatility(&report.volatility) {
        Some(peak) => {
            writeln!(out, "{}", sparkline(&defined))?;
            writeln!(
                out,
                "Peak: {} on {}",
                optional_amount(peak.value),
                peak.date
            )?;
            let latest = report.volatility.last().and_then(|point| point.value);
            writeln!(out, "Latest: {}", optional_amount(latest))
        }
        None => writeln!(out, "Not enough rows for a rolling window."),
    }
}

/// Every dashboard section, in display order
pub fn render_dashboard(
    out: &mut impl Write,
    table: &ForecastTable,
    report: &DashboardReport,
    preview_rows: usize,
) -> io::Result<()> {
    render_preview(out, table, preview_rows)?;
    render_filtered(out, report)?;

    section(out, "Forecast Summary")?;
    write!(out, "{}", report.summary)?;

    section(out, "Forecast Insight")?;
    writeln!(out, "Insight Generated:")?;
    write!(out, "{}", report.insight.text)?;

    render_anomalies(out, &report.anomalies)?;
    render_monthly(out, &report.monthly)?;
    render_rankings(out, &report.rankings)?;
    render_volatility(out, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_levels() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0]), "▁▅█");
        assert_eq!(sparkline(&[4.0, 4.0]), "▅▅");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn test_downsample_keeps_width() {
        let values: Vec<f64> = (0..200).map(f64::from).collect();
        let reduced = downsample(&values, 60);
        assert_eq!(reduced.len(), 60);
        assert!(reduced.windows(2).all(|w| w[0] < w[1]));
    }
}
