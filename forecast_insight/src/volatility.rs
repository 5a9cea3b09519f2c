//! Rolling volatility of the forecast series

use crate::data::ForecastTable;
use crate::error::Result;
use chrono::NaiveDate;
use insight_math::RollingStdDev;
use serde::Serialize;

/// Default number of trailing rows in each volatility window
pub const DEFAULT_VOLATILITY_WINDOW: usize = 7;

/// Volatility value attached to the date that closes its window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolatilityPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Trailing sample standard deviation of the forecast over `window` rows
///
/// The result has one entry per row in date order. The first `window - 1`
/// entries are `None`.
pub fn rolling_volatility(table: &ForecastTable, window: usize) -> Result<Vec<Option<f64>>> {
    let rows = table.non_empty_rows()?;
    let mut std_dev = RollingStdDev::new(window)?;

    Ok(rows.iter().map(|row| std_dev.step(row.forecast)).collect())
}

/// [`rolling_volatility`] paired with the row dates
pub fn volatility_series(table: &ForecastTable, window: usize) -> Result<Vec<VolatilityPoint>> {
    let values = rolling_volatility(table, window)?;

    Ok(table
        .rows()
        .iter()
        .zip(values)
        .map(|(row, value)| VolatilityPoint {
            date: row.date,
            value,
        })
        .collect())
}

/// Largest defined volatility value, with its date
pub fn peak_volatility(points: &[VolatilityPoint]) -> Option<VolatilityPoint> {
    points
        .iter()
        .filter_map(|point| point.value.map(|value| (point, value)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(point, _)| *point)
}
