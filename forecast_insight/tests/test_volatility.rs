use assert_approx_eq::assert_approx_eq;
use chrono::{Duration, NaiveDate};
use forecast_insight::data::ForecastTable;
use forecast_insight::error::{FailureKind, InsightError};
use insight_math::MathError;
use forecast_insight::volatility::{
    peak_volatility, rolling_volatility, volatility_series, DEFAULT_VOLATILITY_WINDOW,
};

fn create_test_data() -> ForecastTable {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let dates = (0..10).map(|i| start + Duration::days(i)).collect();

    // A series whose swings grow over time
    let values = vec![
        100.0, 101.0, 100.5, 102.0, 100.0, 103.0, 99.0, 105.0, 98.0, 106.0,
    ];

    ForecastTable::from_series(dates, values).unwrap()
}

fn sample_std(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[test]
fn test_rolling_volatility_leading_values_undefined() {
    let data = create_test_data();

    let vol = rolling_volatility(&data, DEFAULT_VOLATILITY_WINDOW).unwrap();

    assert_eq!(vol.len(), data.len());
    for value in &vol[..DEFAULT_VOLATILITY_WINDOW - 1] {
        assert!(value.is_none());
    }
    for value in &vol[DEFAULT_VOLATILITY_WINDOW - 1..] {
        assert!(value.unwrap() > 0.0);
    }
}

#[test]
fn test_rolling_volatility_matches_trailing_window() {
    let data = create_test_data();
    let values = data.forecasts();

    let vol = rolling_volatility(&data, 7).unwrap();

    for i in 6..values.len() {
        assert_approx_eq!(vol[i].unwrap(), sample_std(&values[i - 6..=i]));
    }
}

#[test]
fn test_rolling_volatility_short_table() {
    let data = create_test_data();
    let short = ForecastTable::new(data.rows()[..4].to_vec()).unwrap();

    let vol = rolling_volatility(&short, 7).unwrap();
    assert_eq!(vol, vec![None; 4]);
}

#[test]
fn test_rolling_volatility_invalid_window() {
    let data = create_test_data();

    let err = rolling_volatility(&data, 1).unwrap_err();
    assert!(matches!(err, InsightError::MathError(MathError::InvalidInput(_))));
    assert_eq!(err.kind(), FailureKind::InvalidParameter);
    assert!(matches!(
        rolling_volatility(&ForecastTable::empty(), 7),
        Err(InsightError::NoData)
    ));
}

#[test]
fn test_volatility_series_and_peak() {
    let data = create_test_data();

    let series = volatility_series(&data, 3).unwrap();
    assert_eq!(series.len(), data.len());
    assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());

    // The widest three-day swing closes the series: 105, 98, 106
    let peak = peak_volatility(&series).unwrap();
    assert_eq!(peak.date, NaiveDate::from_ymd_opt(2023, 1, 10).unwrap());
    assert_approx_eq!(peak.value.unwrap(), sample_std(&[105.0, 98.0, 106.0]));

    assert!(peak_volatility(&series[..2]).is_none());
}
