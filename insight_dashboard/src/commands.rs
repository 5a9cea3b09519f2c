//! Command handlers
//!
//! Data failures are reported in place and end the command normally. Only
//! settings problems and failures to write output are returned as errors.

use crate::cli::{AnalysisArgs, ExportArgs, GenerateArgs, OutputFormat, ReportArgs, ShowArgs};
use crate::render;
use crate::settings::Settings;
use anyhow::{Context, Result};
use forecast_insight::export::{export_chart_data, write_table};
use forecast_insight::metrics::insight;
use forecast_insight::sample::{generate, SampleSpec};
use forecast_insight::{
    DashboardReport, DataLoader, DateRange, ForecastTable, InsightDownload, InsightError,
    MetricsEngine, PlotAsset,
};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Load the forecast table, or print the error state and return `None`
fn load_table(out: &mut impl Write, path: &Path) -> Result<Option<ForecastTable>> {
    let loaded = DataLoader::from_path(path).and_then(|table| {
        if table.is_empty() {
            Err(InsightError::NoData)
        } else {
            Ok(table)
        }
    });

    match loaded {
        Ok(table) => Ok(Some(table)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Forecast data unavailable");
            render::render_unavailable(out, &e)?;
            Ok(None)
        }
    }
}

fn engine_for(settings: &Settings, args: &AnalysisArgs) -> Result<MetricsEngine> {
    let mut engine = settings.engine()?;
    if let Some(threshold) = args.threshold {
        engine = engine.with_anomaly_threshold(threshold)?;
    }
    Ok(engine)
}

fn analyze(
    table: &ForecastTable,
    engine: &MetricsEngine,
    args: &AnalysisArgs,
) -> Result<DashboardReport> {
    let range = DateRange::resolve(table, args.start, args.end)?;
    Ok(engine.analyze(table, range)?)
}

/// The `show` command
pub fn handle_show(out: &mut impl Write, args: ShowArgs, settings: &Settings) -> Result<()> {
    let engine = engine_for(settings, &args.analysis)?;
    let csv = args.data.csv.unwrap_or_else(|| settings.data.forecast_csv.clone());
    let plot_path = args.plot.unwrap_or_else(|| settings.data.forecast_plot.clone());

    // The plot is independent of the forecast data
    let plot = PlotAsset::locate(&plot_path);
    if let Err(e) = &plot {
        warn!(error = %e, "Forecast plot unavailable");
    }
    if args.format == OutputFormat::Text {
        render::render_plot_status(out, &plot)?;
    }

    let Some(table) = load_table(out, &csv)? else {
        return Ok(());
    };
    let report = analyze(&table, &engine, &args.analysis)?.with_plot(plot.as_ref().ok());

    match args.format {
        OutputFormat::Json => writeln!(out, "{}", report.to_json()?)?,
        OutputFormat::Text => {
            render::render_dashboard(out, &table, &report, settings.analysis.preview_rows)?;
        }
    }
    Ok(())
}

/// The `report` command
pub fn handle_report(out: &mut impl Write, args: ReportArgs, settings: &Settings) -> Result<()> {
    let csv = args.data.csv.unwrap_or_else(|| settings.data.forecast_csv.clone());
    let dir = args.out.unwrap_or_else(|| settings.output.report_dir.clone());

    let Some(table) = load_table(out, &csv)? else {
        return Ok(());
    };
    let insight = insight(&table, settings.analysis.insight_window)?;
    let download = InsightDownload::from_insight(&insight);

    let path = download
        .write_to(&dir)
        .with_context(|| format!("Failed to write insight report into {}", dir.display()))?;
    writeln!(out, "Insight written to {} ({})", path.display(), download.mime)?;
    Ok(())
}

/// The `export` command
pub fn handle_export(out: &mut impl Write, args: ExportArgs, settings: &Settings) -> Result<()> {
    let engine = engine_for(settings, &args.analysis)?;
    let csv = args.data.csv.unwrap_or_else(|| settings.data.forecast_csv.clone());
    let dir = args.out.unwrap_or_else(|| settings.output.export_dir.clone());

    let Some(table) = load_table(out, &csv)? else {
        return Ok(());
    };
    let report = analyze(&table, &engine, &args.analysis)?;

    let written = export_chart_data(&report, &dir)
        .with_context(|| format!("Failed to export chart data into {}", dir.display()))?;
    for path in written {
        writeln!(out, "Wrote {}", path.display())?;
    }
    Ok(())
}

/// The `generate` command
pub fn handle_generate(out: &mut impl Write, args: GenerateArgs) -> Result<()> {
    let defaults = SampleSpec::default();
    let spec = SampleSpec {
        start: args.start.unwrap_or(defaults.start),
        days: args.days,
        seed: args.seed,
        with_actuals: !args.no_actuals,
        ..defaults
    };

    let table = generate(&spec)?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    write_table(&table, &args.out)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;

    info!(path = %args.out.display(), rows = table.len(), "Generated sample forecast");
    writeln!(out, "Wrote {} rows to {}", table.len(), args.out.display())?;
    Ok(())
}
