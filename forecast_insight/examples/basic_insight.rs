//! Generate a sample forecast, then print its summary, insight and anomalies.
//!
//! Run with `cargo run -p forecast_insight --example basic_insight`.

use forecast_insight::sample::{generate, SampleSpec};
use forecast_insight::{DateRange, InsightError, MetricsEngine};

fn main() -> Result<(), InsightError> {
    let table = generate(&SampleSpec::default())?;
    let engine = MetricsEngine::new().with_anomaly_threshold(1.5)?;

    let range = DateRange::covering(&table).ok_or(InsightError::NoData)?;
    let report = engine.analyze(&table, range)?;

    println!("{}", report.summary);
    println!("{}", report.insight.text);
    println!(
        "Detected {} anomalies (based on threshold: {:.1} std)",
        report.anomalies.len(),
        report.anomalies.threshold
    );
    for month in &report.monthly {
        println!("  {}  {:>10.2}", month.month, month.avg_forecast);
    }

    Ok(())
}
