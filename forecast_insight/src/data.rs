//! Forecast table loading and handling

use crate::error::{InsightError, Result};
use crate::utils::date_parser::parse_date;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the date column in forecast files
pub const DATE_COLUMN: &str = "ds";
/// Name of the predicted value column
pub const FORECAST_COLUMN: &str = "forecast";
/// Name of the optional observed value column
pub const ACTUAL_COLUMN: &str = "actual";

/// One observation of the forecast table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Predicted value
    pub forecast: f64,
    /// Observed value, when ground truth is known for the date
    pub actual: Option<f64>,
}

impl ForecastRow {
    /// Create a row without an observed value
    pub fn new(date: NaiveDate, forecast: f64) -> Self {
        Self {
            date,
            forecast,
            actual: None,
        }
    }

    /// Create a row carrying an observed value
    pub fn with_actual(date: NaiveDate, forecast: f64, actual: f64) -> Self {
        Self {
            date,
            forecast,
            actual: Some(actual),
        }
    }

    /// `|actual - forecast|`, if the row has an observed value
    pub fn absolute_error(&self) -> Option<f64> {
        self.actual.map(|actual| (actual - self.forecast).abs())
    }
}

/// Date-ordered sequence of forecast rows with unique dates
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
}

impl ForecastTable {
    /// Build a table from rows in any order
    ///
    /// Rows are sorted by date. Duplicate dates and non-finite values are
    /// rejected.
    pub fn new(mut rows: Vec<ForecastRow>) -> Result<Self> {
        rows.sort_by_key(|row| row.date);

        if let Some(pair) = rows.windows(2).find(|pair| pair[0].date == pair[1].date) {
            return Err(InsightError::InvalidData(format!(
                "Duplicate date in forecast table: {}",
                pair[0].date
            )));
        }

        if let Some(row) = rows
            .iter()
            .find(|row| !row.forecast.is_finite() || row.actual.is_some_and(|a| !a.is_finite()))
        {
            return Err(InsightError::InvalidData(format!(
                "Non-finite value on {}",
                row.date
            )));
        }

        Ok(Self { rows })
    }

    /// A table without rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a table from parallel date and forecast vectors
    pub fn from_series(dates: Vec<NaiveDate>, forecasts: Vec<f64>) -> Result<Self> {
        if dates.len() != forecasts.len() {
            return Err(InsightError::InvalidData(format!(
                "Got {} dates but {} forecast values",
                dates.len(),
                forecasts.len()
            )));
        }

        Self::new(
            dates
                .into_iter()
                .zip(forecasts)
                .map(|(date, forecast)| ForecastRow::new(date, forecast))
                .collect(),
        )
    }

    /// Rows in ascending date order
    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    /// Rows in ascending date order, or `NoData` for an empty table
    pub fn non_empty_rows(&self) -> Result<&[ForecastRow]> {
        if self.rows.is_empty() {
            return Err(InsightError::NoData);
        }
        Ok(&self.rows)
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|row| row.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|row| row.date)
    }

    /// The forecast column as a vector
    pub fn forecasts(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.forecast).collect()
    }

    /// The last `n` rows, or all of them when the table is shorter
    pub fn tail(&self, n: usize) -> &[ForecastRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }

    /// Whether at least one row has an observed value
    pub fn has_actuals(&self) -> bool {
        self.rows.iter().any(|row| row.actual.is_some())
    }

    /// Rows whose date lies in the inclusive range `[start, end]`
    ///
    /// A reversed range yields an empty table.
    pub fn filter_range(&self, start: NaiveDate, end: NaiveDate) -> ForecastTable {
        if start > end {
            debug!(%start, %end, "Reversed date range, filter is empty");
            return ForecastTable::empty();
        }

        ForecastTable {
            rows: self
                .rows
                .iter()
                .filter(|row| row.date >= start && row.date <= end)
                .cloned()
                .collect(),
        }
    }
}

/// Data loader for forecast tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a forecast table, choosing the reader from the file extension
    ///
    /// `.parquet` and `.pq` files are read as Parquet, anything else as CSV.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ForecastTable> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("parquet") | Some("pq") => Self::from_parquet(path),
            _ => Self::from_csv(path),
        }
    }

    /// Load a forecast table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<ForecastTable> {
        let path = path.as_ref();
        let file = Self::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        let table = Self::from_dataframe(&df)?;
        info!(path = %path.display(), rows = table.len(), "Loaded forecast table");
        Ok(table)
    }

    /// Load a forecast table from a Parquet file
    pub fn from_parquet<P: AsRef<Path>>(path: P) -> Result<ForecastTable> {
        let path = path.as_ref();
        let file = Self::open(path)?;
        let df = ParquetReader::new(file).finish()?;

        let table = Self::from_dataframe(&df)?;
        info!(path = %path.display(), rows = table.len(), "Loaded forecast table");
        Ok(table)
    }

    /// Convert a DataFrame with `ds`, `forecast` and optional `actual` columns
    pub fn from_dataframe(df: &DataFrame) -> Result<ForecastTable> {
        let date_column = Self::require_column(df, DATE_COLUMN)?;
        let forecast_column = Self::require_column(df, FORECAST_COLUMN)?;
        let actual_column = Self::find_column(df, ACTUAL_COLUMN);

        let dates = Self::parse_dates(date_column)?;
        let forecasts = Self::numeric_values(forecast_column)?;
        let actuals = match actual_column {
            Some(column) => Self::numeric_values(column)?,
            None => {
                warn!("No '{}' column, accuracy metrics will be skipped", ACTUAL_COLUMN);
                vec![None; dates.len()]
            }
        };

        let mut rows = Vec::with_capacity(dates.len());
        for (i, ((date, forecast), actual)) in dates.into_iter().zip(forecasts).zip(actuals).enumerate() {
            let forecast = forecast.ok_or_else(|| {
                InsightError::InvalidData(format!("Missing forecast value in row {}", i + 1))
            })?;
            rows.push(ForecastRow {
                date,
                forecast,
                actual,
            });
        }

        debug!(rows = rows.len(), "Converted DataFrame to forecast rows");
        ForecastTable::new(rows)
    }

    fn open(path: &Path) -> Result<File> {
        if !path.exists() {
            return Err(InsightError::MissingInput(path.to_path_buf()));
        }
        Ok(File::open(path)?)
    }

    /// Find a column by name, ignoring case and surrounding whitespace
    fn find_column<'a>(df: &'a DataFrame, name: &str) -> Option<&'a Series> {
        df.get_columns()
            .iter()
            .find(|column| column.name().trim().eq_ignore_ascii_case(name))
    }

    fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
        Self::find_column(df, name).ok_or_else(|| {
            InsightError::InvalidData(format!(
                "Column '{}' not found (columns: {:?})",
                name,
                df.get_column_names()
            ))
        })
    }

    fn parse_dates(column: &Series) -> Result<Vec<NaiveDate>> {
        let text = column.cast(&DataType::Utf8)?;
        text.utf8()?
            .into_iter()
            .enumerate()
            .map(|(i, value)| match value {
                Some(value) => parse_date(value),
                None => Err(InsightError::InvalidData(format!(
                    "Missing date in row {}",
                    i + 1
                ))),
            })
            .collect()
    }

    /// Read a column as optional f64 values
    ///
    /// Blank cells become `None`; cells that are present but not numeric are
    /// an error.
    fn numeric_values(column: &Series) -> Result<Vec<Option<f64>>> {
        if column.dtype() == &DataType::Utf8 {
            return column
                .utf8()?
                .into_iter()
                .enumerate()
                .map(|(i, value)| match value.map(str::trim) {
                    None | Some("") => Ok(None),
                    Some(text) => text.parse::<f64>().map(Some).map_err(|_| {
                        InsightError::InvalidData(format!(
                            "Non-numeric value '{}' in column '{}', row {}",
                            text,
                            column.name(),
                            i + 1
                        ))
                    }),
                })
                .collect();
        }

        let numeric = column.cast(&DataType::Float64)?;
        Ok(numeric.f64()?.into_iter().collect())
    }
}

/// The precomputed forecast plot image shown next to the metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotAsset {
    path: PathBuf,
}

impl PlotAsset {
    /// Check that the plot image exists
    pub fn locate<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(InsightError::MissingInput(path.to_path_buf()));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_new_sorts_by_date() {
        let table = ForecastTable::new(vec![
            ForecastRow::new(date("2024-01-03"), 3.0),
            ForecastRow::new(date("2024-01-01"), 1.0),
            ForecastRow::new(date("2024-01-02"), 2.0),
        ])
        .unwrap();

        assert_eq!(table.forecasts(), vec![1.0, 2.0, 3.0]);
        assert_eq!(table.first_date(), Some(date("2024-01-01")));
        assert_eq!(table.last_date(), Some(date("2024-01-03")));
    }

    #[test]
    fn test_new_rejects_duplicates_and_nan() {
        let duplicate = ForecastTable::new(vec![
            ForecastRow::new(date("2024-01-01"), 1.0),
            ForecastRow::new(date("2024-01-01"), 2.0),
        ]);
        assert!(matches!(duplicate, Err(InsightError::InvalidData(_))));

        let nan = ForecastTable::new(vec![ForecastRow::new(date("2024-01-01"), f64::NAN)]);
        assert!(matches!(nan, Err(InsightError::InvalidData(_))));
    }

    #[test]
    fn test_tail_and_empty() {
        let table = ForecastTable::from_series(
            vec![date("2024-01-01"), date("2024-01-02")],
            vec![1.0, 2.0],
        )
        .unwrap();
        assert_eq!(table.tail(10).len(), 2);
        assert_eq!(table.tail(1)[0].forecast, 2.0);

        let empty = ForecastTable::empty();
        assert!(empty.tail(5).is_empty());
        assert!(matches!(empty.non_empty_rows(), Err(InsightError::NoData)));
    }

    #[test]
    fn test_absolute_error() {
        let row = ForecastRow::with_actual(date("2024-01-01"), 10.0, 7.5);
        assert_eq!(row.absolute_error(), Some(2.5));
        assert_eq!(ForecastRow::new(date("2024-01-01"), 10.0).absolute_error(), None);
    }

    #[test]
    fn test_from_dataframe_with_blank_actuals() {
        let df = df! {
            "ds" => &["2024-01-02", "2024-01-01"],
            "forecast" => &[20.0, 10.0],
            "actual" => &[None, Some(12.0)],
        }
        .unwrap();

        let table = DataLoader::from_dataframe(&df).unwrap();
        assert_eq!(table.rows()[0].actual, Some(12.0));
        assert_eq!(table.rows()[1].actual, None);
    }
}
