use crate::app_config::AppConfig;
use crate::{ConfigError, WageFrequency};

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function,
/// so tests can drive it from a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so an empty line in `.env` is harmless.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let log_level = or_default("TIM_LOG_LEVEL", "info");
    let settings_path = PathBuf::from(or_default("TIM_SETTINGS_PATH", "./config/settings.yaml"));

    let wage_amount = optional("TIM_WAGE_AMOUNT");
    if let Some(amount) = &wage_amount {
        parse_amount("TIM_WAGE_AMOUNT", amount)?;
    }

    let wage_frequency = optional("TIM_WAGE_FREQUENCY")
        .map(|raw| {
            raw.parse::<WageFrequency>()
                .map_err(|reason| ConfigError::InvalidEnvVar {
                    var: "TIM_WAGE_FREQUENCY".to_string(),
                    reason,
                })
        })
        .transpose()?;

    let currency_code = optional("TIM_CURRENCY")
        .map(|raw| parse_currency_code("TIM_CURRENCY", &raw))
        .transpose()?;

    Ok(AppConfig {
        log_level,
        settings_path,
        wage_amount,
        wage_frequency,
        currency_code,
    })
}

fn parse_amount(var: &str, raw: &str) -> Result<f64, ConfigError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
    if !value.is_finite() {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("'{raw}' is not a finite number"),
        });
    }
    Ok(value)
}

/// Accepts any three ASCII letters and returns them uppercased.
fn parse_currency_code(var: &str, raw: &str) -> Result<String, ConfigError> {
    let code = raw.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("'{raw}' is not a three-letter currency code"),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
