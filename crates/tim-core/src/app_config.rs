use std::path::PathBuf;

use crate::WageFrequency;

/// Process-level configuration read from the environment.
///
/// Wage fields are optional overrides layered on top of the settings file
/// by [`crate::resolve_settings`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub log_level: String,
    pub settings_path: PathBuf,
    pub wage_amount: Option<String>,
    pub wage_frequency: Option<WageFrequency>,
    pub currency_code: Option<String>,
}
