use assert_approx_eq::assert_approx_eq;
use chrono::NaiveDate;
use forecast_insight::data::{ForecastRow, ForecastTable};
use forecast_insight::error::InsightError;
use forecast_insight::metrics::{
    detect_anomalies, insight, monthly_average, summarize, top_bottom, Trend,
};
use forecast_insight::utils::YearMonth;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn table(points: &[(&str, f64)]) -> ForecastTable {
    ForecastTable::new(
        points
            .iter()
            .map(|(d, v)| ForecastRow::new(date(d), *v))
            .collect(),
    )
    .unwrap()
}

fn daily(values: &[f64]) -> ForecastTable {
    let start = date("2024-01-01");
    let dates = (0..values.len())
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();
    ForecastTable::from_series(dates, values.to_vec()).unwrap()
}

/// Nine flat days followed by one spike
fn spiky() -> ForecastTable {
    let mut values = vec![10.0; 9];
    values.push(100.0);
    daily(&values)
}

#[test]
fn test_summarize() {
    let t = ForecastTable::new(vec![
        ForecastRow::with_actual(date("2024-01-01"), 100.0, 110.0),
        ForecastRow::new(date("2024-01-02"), 200.0),
        ForecastRow::with_actual(date("2024-01-03"), 300.0, 270.0),
    ])
    .unwrap();

    let summary = summarize(&t).unwrap();

    assert_eq!(summary.count, 3);
    assert_eq!(summary.max, 300.0);
    assert_eq!(summary.min, 100.0);
    assert_approx_eq!(summary.mean, 200.0);
    assert_approx_eq!(summary.std_dev.unwrap(), 100.0);
    // Row without an actual is excluded, not counted as zero
    assert_approx_eq!(summary.mae.unwrap(), 20.0);
    assert_eq!(summary.actual_count, 2);
    assert!(summary.max >= summary.min);
}

#[test]
fn test_summarize_without_actuals() {
    let summary = summarize(&daily(&[5.0])).unwrap();

    assert_eq!(summary.count, 1);
    assert_eq!(summary.mae, None);
    assert_eq!(summary.std_dev, None);
    assert_eq!(summary.max, summary.min);
}

#[test]
fn test_insight_uses_whole_short_table() {
    let t = table(&[("2024-01-01", 100.0), ("2024-01-02", 200.0), ("2024-01-03", 300.0)]);

    let result = insight(&t, 30).unwrap();

    assert_eq!(result.trend, Trend::Increasing);
    assert_eq!(result.window_len, 3);
    assert_approx_eq!(result.avg, 200.0);
    assert_eq!(result.max, 300.0);
    assert_eq!(result.min, 100.0);
}

#[test]
fn test_insight_window_takes_latest_rows() {
    let result = insight(&daily(&[5.0, 4.0, 3.0, 2.0, 1.0]), 3).unwrap();

    assert_eq!(result.trend, Trend::Decreasing);
    assert_eq!(result.window_len, 3);
    assert_eq!(result.max, 3.0);
    assert_eq!(result.min, 1.0);
    assert_approx_eq!(result.avg, 2.0);
}

#[test]
fn test_insight_equal_ends_are_stable() {
    let result = insight(&daily(&[5.0, 9.0, 5.0]), 30).unwrap();
    assert_eq!(result.trend, Trend::Stable);
    assert!(result.text.contains("stable trend"));
}

#[rstest]
#[case(1.0, 1)]
#[case(2.0, 1)]
#[case(2.8, 1)]
#[case(3.0, 0)]
fn test_detect_anomalies_counts(#[case] threshold: f64, #[case] expected: usize) {
    let scan = detect_anomalies(&spiky(), threshold).unwrap();

    assert_eq!(scan.len(), expected);
    assert_approx_eq!(scan.mean, 19.0);
    assert_approx_eq!(scan.std_dev.unwrap(), 810.0_f64.sqrt());
    if expected > 0 {
        assert!(scan.contains(date("2024-01-10")));
    }
}

#[rstest]
#[case(1.0, 1.5)]
#[case(1.0, 3.0)]
#[case(1.5, 2.0)]
#[case(2.0, 2.0)]
#[case(2.5, 3.0)]
fn test_detect_anomalies_shrinks_with_threshold(#[case] low: f64, #[case] high: f64) {
    let values: Vec<f64> = (0..60)
        .map(|i| 100.0 + ((i * 37) % 23) as f64 * 3.0 + if i % 13 == 0 { 90.0 } else { 0.0 })
        .collect();
    let t = daily(&values);

    let loose = detect_anomalies(&t, low).unwrap();
    let strict = detect_anomalies(&t, high).unwrap();

    assert!(strict.len() <= loose.len());
    for row in &strict.anomalies {
        assert!(loose.contains(row.date));
    }
}

#[test]
fn test_detect_anomalies_uses_whole_table() {
    let t = spiky();
    let recent = t.filter_range(date("2024-01-01"), date("2024-01-09"));

    // The flat part alone has no spread and therefore no anomalies
    assert!(detect_anomalies(&recent, 1.0).unwrap().is_empty());
    assert_eq!(detect_anomalies(&t, 1.0).unwrap().len(), 1);
}

#[test]
fn test_detect_anomalies_single_row() {
    let scan = detect_anomalies(&daily(&[42.0]), 1.0).unwrap();
    assert!(scan.is_empty());
    assert_eq!(scan.std_dev, None);
}

#[rstest]
#[case(0.5)]
#[case(3.5)]
#[case(f64::NAN)]
fn test_detect_anomalies_rejects_threshold(#[case] threshold: f64) {
    let result = detect_anomalies(&spiky(), threshold);
    assert!(matches!(result, Err(InsightError::InvalidParameter(_))));
}

#[test]
fn test_monthly_average() {
    let t = table(&[("2024-02-05", 30.0), ("2024-01-01", 10.0), ("2024-01-15", 20.0)]);

    let monthly = monthly_average(&t).unwrap();

    let months: Vec<(String, f64)> = monthly
        .iter()
        .map(|m| (m.month.to_string(), m.avg_forecast))
        .collect();
    assert_eq!(
        months,
        vec![("2024-01".to_string(), 15.0), ("2024-02".to_string(), 30.0)]
    );
    assert_eq!(monthly[0].days, 2);
}

#[test]
fn test_monthly_average_across_years() {
    let t = table(&[("2024-01-10", 4.0), ("2023-12-31", 2.0)]);

    let monthly = monthly_average(&t).unwrap();

    assert_eq!(monthly[0].month, YearMonth::new(2023, 12));
    assert_eq!(monthly[1].month, YearMonth::new(2024, 1));
}

#[test]
fn test_top_bottom_short_table() {
    let t = table(&[("2024-01-01", 100.0), ("2024-01-02", 300.0), ("2024-01-03", 200.0)]);

    let rankings = top_bottom(&t, 5).unwrap();

    let top: Vec<f64> = rankings.top.iter().map(|r| r.forecast).collect();
    let bottom: Vec<f64> = rankings.bottom.iter().map(|r| r.forecast).collect();
    assert_eq!(top, vec![300.0, 200.0, 100.0]);
    assert_eq!(bottom, vec![100.0, 200.0, 300.0]);
}

#[test]
fn test_top_bottom_ties_keep_date_order() {
    let t = table(&[
        ("2024-01-01", 5.0),
        ("2024-01-02", 7.0),
        ("2024-01-03", 5.0),
        ("2024-01-04", 7.0),
    ]);

    let rankings = top_bottom(&t, 5).unwrap();

    let top: Vec<NaiveDate> = rankings.top.iter().map(|r| r.date).collect();
    let bottom: Vec<NaiveDate> = rankings.bottom.iter().map(|r| r.date).collect();
    assert_eq!(
        top,
        vec![date("2024-01-02"), date("2024-01-04"), date("2024-01-01"), date("2024-01-03")]
    );
    assert_eq!(
        bottom,
        vec![date("2024-01-01"), date("2024-01-03"), date("2024-01-02"), date("2024-01-04")]
    );
}

#[test]
fn test_top_bottom_truncates() {
    let rankings = top_bottom(&daily(&[3.0, 9.0, 1.0, 7.0, 5.0, 8.0]), 2).unwrap();

    let top: Vec<f64> = rankings.top.iter().map(|r| r.forecast).collect();
    let bottom: Vec<f64> = rankings.bottom.iter().map(|r| r.forecast).collect();
    assert_eq!(top, vec![9.0, 8.0]);
    assert_eq!(bottom, vec![1.0, 3.0]);
}

#[test]
fn test_empty_table_is_no_data() {
    let empty = ForecastTable::empty();

    assert!(matches!(summarize(&empty), Err(InsightError::NoData)));
    assert!(matches!(insight(&empty, 30), Err(InsightError::NoData)));
    assert!(matches!(detect_anomalies(&empty, 2.0), Err(InsightError::NoData)));
    assert!(matches!(monthly_average(&empty), Err(InsightError::NoData)));
    assert!(matches!(top_bottom(&empty, 5), Err(InsightError::NoData)));
}

#[test]
fn test_invalid_sizes() {
    let t = daily(&[1.0, 2.0]);
    assert!(matches!(insight(&t, 0), Err(InsightError::InvalidParameter(_))));
    assert!(matches!(top_bottom(&t, 0), Err(InsightError::InvalidParameter(_))));
}
