//! Deterministic synthetic forecast tables for demos and tests

use crate::data::{ForecastRow, ForecastTable};
use crate::error::{InsightError, Result};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;
use tracing::debug;

/// Shape of a generated series
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSpec {
    /// Date of the first row
    pub start: NaiveDate,
    /// Number of daily rows
    pub days: usize,
    /// Level of the first forecast
    pub base: f64,
    /// Change of the level per day
    pub trend: f64,
    /// Amplitude of the weekly cycle
    pub weekly_amplitude: f64,
    /// Standard deviation of the noise added to forecasts and actuals
    pub noise: f64,
    pub seed: u64,
    /// Whether rows carry an observed value
    pub with_actuals: bool,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
            days: 90,
            base: 1_000.0,
            trend: 2.5,
            weekly_amplitude: 80.0,
            noise: 40.0,
            seed: 42,
            with_actuals: true,
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Generate a daily forecast table
///
/// The same spec always produces the same table.
pub fn generate(spec: &SampleSpec) -> Result<ForecastTable> {
    if spec.days == 0 {
        return Err(InsightError::InvalidParameter(
            "Sample must contain at least one day".to_string(),
        ));
    }
    let noise = Normal::new(0.0, spec.noise)
        .map_err(|e| InsightError::InvalidParameter(format!("Invalid noise level: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(spec.seed);

    let mut rows = Vec::with_capacity(spec.days);
    for day in 0..spec.days {
        let date = spec
            .start
            .checked_add_days(Days::new(day as u64))
            .ok_or_else(|| InsightError::InvalidParameter("Sample runs past the calendar".to_string()))?;

        let season = spec.weekly_amplitude * (2.0 * PI * day as f64 / 7.0).sin();
        let level = spec.base + spec.trend * day as f64 + season;
        let forecast = round_cents(level + noise.sample(&mut rng));

        let row = if spec.with_actuals {
            ForecastRow::with_actual(date, forecast, round_cents(level + noise.sample(&mut rng)))
        } else {
            ForecastRow::new(date, forecast)
        };
        rows.push(row);
    }

    debug!(days = spec.days, seed = spec.seed, "Generated sample forecast");
    ForecastTable::new(rows)
}
