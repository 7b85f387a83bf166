pub mod app_config;
pub mod config;
pub mod currency;
pub mod number_format;
pub mod price;
pub mod settings;
pub mod wage;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use number_format::NumberFormat;
pub use price::{MatchSource, PriceMatch, TimeBreakdown, TimeDuration};
pub use settings::{load_settings, resolve_settings, validate_settings, Settings, TimeFormat};
pub use wage::{WageConfig, WageFrequency, DEFAULT_CURRENCY_CODE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read settings file {path}: {source}")]
    SettingsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file: {0}")]
    SettingsFileParse(#[from] serde_yaml::Error),

    #[error("settings validation failed: {0}")]
    Validation(String),
}
