use serde::{Deserialize, Serialize};

/// Currency assumed for a wage when the user never picked one.
pub const DEFAULT_CURRENCY_CODE: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WageFrequency {
    Hourly,
    Yearly,
}

impl std::fmt::Display for WageFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WageFrequency::Hourly => write!(f, "hourly"),
            WageFrequency::Yearly => write!(f, "yearly"),
        }
    }
}

impl std::str::FromStr for WageFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Ok(WageFrequency::Hourly),
            "yearly" => Ok(WageFrequency::Yearly),
            other => Err(format!("unknown wage frequency '{other}'; expected hourly or yearly")),
        }
    }
}

/// The user's wage, exactly as entered in the extension settings.
///
/// `amount` stays a string so the converter can reproduce how a malformed
/// entry behaves (it never converts) instead of rejecting it at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WageConfig {
    pub amount: String,
    /// `None` is treated as hourly.
    #[serde(default)]
    pub frequency: Option<WageFrequency>,
    #[serde(default = "default_currency_code")]
    pub currency_code: String,
}

fn default_currency_code() -> String {
    DEFAULT_CURRENCY_CODE.to_string()
}

impl WageConfig {
    #[must_use]
    pub fn new(amount: impl Into<String>, frequency: WageFrequency) -> Self {
        Self {
            amount: amount.into(),
            frequency: Some(frequency),
            currency_code: default_currency_code(),
        }
    }

    #[must_use]
    pub fn hourly(amount: impl Into<String>) -> Self {
        Self::new(amount, WageFrequency::Hourly)
    }

    #[must_use]
    pub fn yearly(amount: impl Into<String>) -> Self {
        Self::new(amount, WageFrequency::Yearly)
    }

    #[must_use]
    pub fn with_currency(mut self, code: impl Into<String>) -> Self {
        self.currency_code = code.into();
        self
    }

    /// Returns `true` when the amount is absent or blank.
    #[must_use]
    pub fn is_amount_missing(&self) -> bool {
        self.amount.trim().is_empty()
    }
}
