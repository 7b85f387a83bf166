use std::io::Write;
use std::path::PathBuf;

use super::*;
use crate::{TimeFormat, WageFrequency};

fn write_settings(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(yaml.as_bytes()).expect("write settings");
    file
}

fn app_config(path: PathBuf) -> AppConfig {
    AppConfig {
        log_level: "info".to_string(),
        settings_path: path,
        wage_amount: None,
        wage_frequency: None,
        currency_code: None,
    }
}

#[test]
fn load_minimal_settings() {
    let file = write_settings("wage:\n  amount: \"20\"\n  frequency: hourly\n");
    let settings = load_settings(file.path()).unwrap();
    assert_eq!(settings.wage.amount, "20");
    assert_eq!(settings.wage.frequency, Some(WageFrequency::Hourly));
    assert_eq!(settings.target_currency(), "USD");
    assert_eq!(settings.number_format(), NumberFormat::us());
    assert_eq!(settings.time_format, TimeFormat::Compact);
}

#[test]
fn target_currency_drives_default_number_format() {
    let file = write_settings(
        "wage:\n  amount: \"41600\"\n  frequency: yearly\n  currency_code: EUR\ntime_format: verbose\n",
    );
    let settings = load_settings(file.path()).unwrap();
    assert_eq!(settings.target_currency(), "EUR");
    assert_eq!(settings.number_format(), NumberFormat::european());
    assert_eq!(settings.time_format, TimeFormat::Verbose);
}

#[test]
fn explicit_number_format_wins() {
    let file = write_settings(
        "wage:\n  amount: \"20\"\nnumber_format:\n  thousands: [\"'\"]\n  decimal: [\".\"]\n",
    );
    let settings = load_settings(file.path()).unwrap();
    assert!(settings.number_format().is_thousands('\''));
}

#[test]
fn missing_file_is_io_error() {
    let result = load_settings(std::path::Path::new("/nonexistent/tim/settings.yaml"));
    assert!(matches!(result, Err(ConfigError::SettingsFileIo { .. })));
}

#[test]
fn malformed_yaml_is_parse_error() {
    let file = write_settings("wage: [not, a, map]\n");
    let result = load_settings(file.path());
    assert!(matches!(result, Err(ConfigError::SettingsFileParse(_))));
}

#[test]
fn non_numeric_wage_fails_validation() {
    let file = write_settings("wage:\n  amount: \"lots\"\n");
    let result = load_settings(file.path());
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("lots")),
        "got: {result:?}"
    );
}

#[test]
fn lowercase_currency_fails_validation() {
    let file = write_settings("wage:\n  amount: \"20\"\ntarget_currency: usd\n");
    let result = load_settings(file.path());
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn overlapping_separators_fail_validation() {
    let file = write_settings(
        "wage:\n  amount: \"20\"\nnumber_format:\n  thousands: [\",\"]\n  decimal: [\",\"]\n",
    );
    let result = load_settings(file.path());
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("both")),
        "got: {result:?}"
    );
}

#[test]
fn resolve_without_file_uses_defaults() {
    let cfg = app_config(PathBuf::from("/nonexistent/tim/settings.yaml"));
    let settings = resolve_settings(&cfg).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn resolve_applies_env_overrides_over_file() {
    let file = write_settings("wage:\n  amount: \"20\"\n  frequency: hourly\n");
    let mut cfg = app_config(file.path().to_path_buf());
    cfg.wage_amount = Some("52000".to_string());
    cfg.wage_frequency = Some(WageFrequency::Yearly);
    cfg.currency_code = Some("GBP".to_string());

    let settings = resolve_settings(&cfg).unwrap();
    assert_eq!(settings.wage.amount, "52000");
    assert_eq!(settings.wage.frequency, Some(WageFrequency::Yearly));
    assert_eq!(settings.wage.currency_code, "GBP");
    assert_eq!(settings.target_currency(), "GBP");
}

#[test]
fn shipped_settings_file_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("settings.yaml");
    assert!(path.exists(), "settings.yaml missing at {path:?}");
    let settings = load_settings(&path).expect("failed to load settings.yaml");
    assert_eq!(settings.wage.amount, "20");
    assert_eq!(settings.target_currency(), "USD");
}
