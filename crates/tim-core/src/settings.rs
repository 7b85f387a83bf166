use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app_config::AppConfig;
use crate::{ConfigError, NumberFormat, WageConfig};

/// How the work-time annotation is written after a price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    /// `2h 30m`
    #[default]
    Compact,
    /// `2 hours, 30 minutes`
    Verbose,
}

/// The persisted extension settings a scan session runs with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub wage: WageConfig,
    /// Only prices in this currency are annotated. Defaults to the wage currency.
    #[serde(default)]
    pub target_currency: Option<String>,
    /// Separator rules for the page. Defaults to the usual format of the target currency.
    #[serde(default)]
    pub number_format: Option<NumberFormat>,
    #[serde(default)]
    pub time_format: TimeFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wage: WageConfig::hourly("15"),
            target_currency: None,
            number_format: None,
            time_format: TimeFormat::default(),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn target_currency(&self) -> &str {
        self.target_currency
            .as_deref()
            .unwrap_or(&self.wage.currency_code)
    }

    #[must_use]
    pub fn number_format(&self) -> NumberFormat {
        self.number_format
            .clone()
            .unwrap_or_else(|| NumberFormat::for_currency(self.target_currency()))
    }
}

/// Load and validate settings from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SettingsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let settings: Settings = serde_yaml::from_str(&content)?;

    validate_settings(&settings)?;

    Ok(settings)
}

/// Settings for this process: the settings file if it exists (defaults
/// otherwise), with any wage overrides from the environment applied on top.
///
/// # Errors
///
/// Returns `ConfigError` if the settings file exists but is invalid, or the
/// merged result fails validation.
pub fn resolve_settings(config: &AppConfig) -> Result<Settings, ConfigError> {
    let mut settings = if config.settings_path.exists() {
        load_settings(&config.settings_path)?
    } else {
        Settings::default()
    };

    if let Some(amount) = &config.wage_amount {
        settings.wage.amount.clone_from(amount);
    }
    if let Some(frequency) = config.wage_frequency {
        settings.wage.frequency = Some(frequency);
    }
    if let Some(code) = &config.currency_code {
        settings.wage.currency_code.clone_from(code);
        settings.target_currency = Some(code.clone());
    }

    validate_settings(&settings)?;

    Ok(settings)
}

/// Checks the wage amount, currency codes and number format.
///
/// # Errors
///
/// Returns `ConfigError::Validation` naming the first invalid field.
pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    let amount = settings.wage.amount.trim();
    if amount.is_empty() {
        return Err(ConfigError::Validation(
            "wage amount must be non-empty".to_string(),
        ));
    }
    match amount.parse::<f64>() {
        Ok(v) if v.is_finite() => {}
        _ => {
            return Err(ConfigError::Validation(format!(
                "wage amount '{amount}' is not a finite number"
            )));
        }
    }

    for code in [
        Some(settings.wage.currency_code.as_str()),
        settings.target_currency.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "currency code '{code}' must be three uppercase letters"
            )));
        }
    }

    if let Some(format) = &settings.number_format {
        if format.decimal.is_empty() {
            return Err(ConfigError::Validation(
                "number format needs at least one decimal separator".to_string(),
            ));
        }
        if let Some(c) = format.overlapping_separator() {
            return Err(ConfigError::Validation(format!(
                "'{c}' cannot be both a thousands and a decimal separator"
            )));
        }
        if let Some(c) = format
            .thousands
            .iter()
            .chain(&format.decimal)
            .find(|c| c.is_ascii_digit())
        {
            return Err(ConfigError::Validation(format!(
                "'{c}' cannot be used as a separator"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
