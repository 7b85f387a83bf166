//! Locale separator rules used when turning matched digits into a value.
//!
//! The same string reads differently depending on the page locale:
//! `"1.234,50"` is one thousand and change in Germany, and `"1,234.50"` is
//! the same amount in the US. A [`NumberFormat`] names which characters
//! group thousands and which mark the decimal point.

use serde::{Deserialize, Serialize};

const NO_BREAK_SPACE: char = '\u{00a0}';
const NARROW_NO_BREAK_SPACE: char = '\u{202f}';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub thousands: Vec<char>,
    pub decimal: Vec<char>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::us()
    }
}

impl NumberFormat {
    /// `1,234.56`
    #[must_use]
    pub fn us() -> Self {
        Self {
            thousands: vec![','],
            decimal: vec!['.'],
        }
    }

    /// `1.234,56` and `1 234,56`
    #[must_use]
    pub fn european() -> Self {
        Self {
            thousands: vec!['.', NO_BREAK_SPACE, NARROW_NO_BREAK_SPACE],
            decimal: vec![','],
        }
    }

    /// `1'234.56`
    #[must_use]
    pub fn swiss() -> Self {
        Self {
            thousands: vec!['\'', '\u{2019}'],
            decimal: vec!['.'],
        }
    }

    /// Machine-readable amounts from attributes like `data-price="1234.56"`.
    #[must_use]
    pub fn machine() -> Self {
        Self {
            thousands: Vec::new(),
            decimal: vec!['.'],
        }
    }

    /// Picks the usual separators for prices shown in `code`.
    #[must_use]
    pub fn for_currency(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "EUR" | "DKK" | "NOK" | "SEK" | "PLN" | "CZK" | "HUF" | "RON" | "BRL" | "TRY"
            | "IDR" | "VND" | "RUB" => Self::european(),
            "CHF" => Self::swiss(),
            _ => Self::us(),
        }
    }

    #[must_use]
    pub fn is_thousands(&self, c: char) -> bool {
        self.thousands.contains(&c)
    }

    #[must_use]
    pub fn is_decimal(&self, c: char) -> bool {
        self.decimal.contains(&c)
    }

    /// Returns the first character that appears in both separator sets.
    #[must_use]
    pub fn overlapping_separator(&self) -> Option<char> {
        self.thousands.iter().copied().find(|c| self.is_decimal(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euro_prices_use_comma_decimal() {
        let fmt = NumberFormat::for_currency("eur");
        assert!(fmt.is_decimal(','));
        assert!(fmt.is_thousands('.'));
    }

    #[test]
    fn unknown_currency_falls_back_to_us() {
        assert_eq!(NumberFormat::for_currency("XYZ"), NumberFormat::us());
    }

    #[test]
    fn presets_have_disjoint_separators() {
        for fmt in [
            NumberFormat::us(),
            NumberFormat::european(),
            NumberFormat::swiss(),
            NumberFormat::machine(),
        ] {
            assert_eq!(fmt.overlapping_separator(), None, "{fmt:?}");
        }
    }

    #[test]
    fn deserializes_from_single_char_strings() {
        let fmt: NumberFormat =
            serde_json::from_str(r#"{"thousands":[" ", "."],"decimal":[","]}"#).unwrap();
        assert!(fmt.is_thousands(' '));
        assert!(fmt.is_decimal(','));
    }
}
