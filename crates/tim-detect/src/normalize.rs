//! Locale-aware normalization of matched digit runs into decimal values.
//!
//! The pattern library hands over the raw numeric run exactly as it appeared
//! on the page (`"1,234.56"`, `"1.234,56"`, `"123.45.67"`); this module turns
//! it into a cents-rounded [`Decimal`] using the page's [`NumberFormat`].

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use tim_core::NumberFormat;

/// Converts a raw digit run into a canonical decimal amount.
///
/// Rules, applied per character:
/// - digits are kept;
/// - every thousands separator is dropped;
/// - the first decimal separator becomes `.`, later ones are dropped so the
///   digits around them merge into the fraction;
/// - whitespace is ignored;
/// - anything else makes the run unparseable.
///
/// The result is rounded to two decimal places, midpoint away from zero.
/// So `"123.45.67"` reads as `123.4567` and normalizes to `123.46`.
///
/// Returns `None` for runs with no digits or values too large for a
/// [`Decimal`].
#[must_use]
pub fn normalize_amount(raw: &str, format: &NumberFormat) -> Option<Decimal> {
    let mut canonical = String::with_capacity(raw.len() + 1);
    let mut seen_decimal = false;
    let mut has_digit = false;

    for c in raw.chars() {
        if c.is_ascii_digit() {
            canonical.push(c);
            has_digit = true;
        } else if format.is_thousands(c) || c.is_whitespace() {
            // grouping only
        } else if format.is_decimal(c) {
            if !seen_decimal {
                canonical.push('.');
                seen_decimal = true;
            }
        } else {
            return None;
        }
    }

    if !has_digit {
        return None;
    }
    if canonical.starts_with('.') {
        canonical.insert(0, '0');
    }
    if canonical.ends_with('.') {
        canonical.pop();
    }

    Decimal::from_str(&canonical)
        .ok()
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Joins separately rendered integer and fraction parts (`"19"`, `"99"`)
/// into one amount. The integer part may still carry grouping and a trailing
/// decimal mark, as in `<span class="whole">1,299.</span>`.
#[must_use]
pub fn join_components(
    integer: &str,
    fraction: Option<&str>,
    format: &NumberFormat,
) -> Option<Decimal> {
    let integer = integer
        .trim()
        .trim_end_matches(|c: char| format.is_decimal(c) || c.is_whitespace());
    let grouping_only = NumberFormat {
        thousands: format
            .thousands
            .iter()
            .chain(&format.decimal)
            .copied()
            .collect(),
        decimal: Vec::new(),
    };
    let whole = normalize_amount(integer, &grouping_only)?;

    let Some(fraction) = fraction.map(str::trim).filter(|f| !f.is_empty()) else {
        return Some(whole);
    };
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let joined = format!("{whole}.{fraction}");
    Decimal::from_str(&joined)
        .ok()
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
