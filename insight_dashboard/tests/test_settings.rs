use insight_dashboard::settings::{ConfigError, Settings};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{Builder, NamedTempFile};

fn settings_file(contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    write!(file, "{}", contents).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_defaults_without_settings_file() {
    let settings = Settings::load(None).unwrap();

    assert_eq!(settings.data.forecast_csv, PathBuf::from("lstm_forecast.csv"));
    assert_eq!(settings.data.forecast_plot, PathBuf::from("lstm_forecast_plot.png"));
    assert_eq!(settings.analysis.anomaly_threshold, 2.0);
    assert_eq!(settings.analysis.insight_window, 30);
    assert_eq!(settings.analysis.volatility_window, 7);
    assert_eq!(settings.analysis.top_k, 5);
    assert_eq!(settings.analysis.preview_rows, 10);
    assert_eq!(settings.logging.filter, "info");
}

#[test]
fn test_file_overrides_defaults() {
    let file = settings_file(
        r#"
[data]
forecast_csv = "data/forecast.csv"

[analysis]
anomaly_threshold = 2.5
top_k = 3

[output]
report_dir = "reports"
"#,
    );

    let settings = Settings::load(Some(file.path())).unwrap();

    assert_eq!(settings.data.forecast_csv, PathBuf::from("data/forecast.csv"));
    assert_eq!(settings.analysis.anomaly_threshold, 2.5);
    assert_eq!(settings.analysis.top_k, 3);
    assert_eq!(settings.analysis.insight_window, 30);
    assert_eq!(settings.output.report_dir, PathBuf::from("reports"));

    let engine = settings.engine().unwrap();
    assert_eq!(engine.anomaly_threshold(), 2.5);
    assert_eq!(engine.top_k(), 3);
}

#[rstest]
#[case::threshold_too_high("[analysis]\nanomaly_threshold = 4.0\n")]
#[case::threshold_too_low("[analysis]\nanomaly_threshold = 0.5\n")]
#[case::volatility_window("[analysis]\nvolatility_window = 1\n")]
#[case::insight_window("[analysis]\ninsight_window = 0\n")]
#[case::top_k("[analysis]\ntop_k = 0\n")]
fn test_validation_rejects_out_of_range_values(#[case] contents: &str) {
    let file = settings_file(contents);
    assert!(matches!(
        Settings::load(Some(file.path())),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_missing_settings_file_is_an_error() {
    let result = Settings::load(Some(PathBuf::from("does_not_exist.toml").as_path()));
    assert!(matches!(result, Err(ConfigError::LoadError(_))));
}
