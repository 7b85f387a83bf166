use std::ops::Range;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Where a [`PriceMatch`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchSource {
    /// Structured or accessible-name attributes such as `data-price` or `aria-label`.
    DomAttribute,
    /// Currency, integer and fraction spread across sibling elements.
    DomStructure,
    /// A currency-adjacent amount in plain text.
    TextPattern,
    /// An amount qualified by words like "from" or "under".
    Contextual,
}

impl MatchSource {
    /// Tie-break rank used when two candidates share a confidence. Higher wins.
    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            MatchSource::DomAttribute => 3,
            MatchSource::DomStructure => 2,
            MatchSource::TextPattern => 1,
            MatchSource::Contextual => 0,
        }
    }
}

impl std::fmt::Display for MatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchSource::DomAttribute => write!(f, "dom-attribute"),
            MatchSource::DomStructure => write!(f, "dom-structure"),
            MatchSource::TextPattern => write!(f, "text-pattern"),
            MatchSource::Contextual => write!(f, "contextual"),
        }
    }
}

/// One candidate price found while scanning page content.
///
/// Construction goes through [`PriceMatch::new`], which enforces the
/// invariants: the value is non-negative and rounded to cents, and the
/// confidence is a real number in `[0, 1]`. A match is never mutated after
/// it is built; the `with_*` helpers return adjusted copies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceMatch {
    value: Decimal,
    currency: String,
    original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    span: Option<Range<usize>>,
    confidence: f64,
    source: MatchSource,
}

impl PriceMatch {
    /// Builds a match, returning `None` if the value is negative or the
    /// confidence is NaN. Confidence outside `[0, 1]` is clamped.
    #[must_use]
    pub fn new(
        value: Decimal,
        currency: impl Into<String>,
        original_text: impl Into<String>,
        confidence: f64,
        source: MatchSource,
    ) -> Option<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return None;
        }
        if confidence.is_nan() {
            return None;
        }
        Some(Self {
            value: value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            currency: currency.into(),
            original_text: original_text.into(),
            span: None,
            confidence: confidence.clamp(0.0, 1.0),
            source,
        })
    }

    /// Attaches the byte range of `original_text` within the scanned string.
    #[must_use]
    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = Some(span);
        self
    }

    /// Returns a copy re-tagged with a different confidence and source, as
    /// the DOM analyzer does when it runs text patterns over an attribute.
    #[must_use]
    pub fn retagged(&self, confidence: f64, source: MatchSource) -> Self {
        let confidence = if confidence.is_nan() {
            self.confidence
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            confidence,
            source,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// The value as a float for time arithmetic. Cents-rounded decimals
    /// always fit, so this only falls back to NaN for absurd magnitudes.
    #[must_use]
    pub fn value_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or(f64::NAN)
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    #[must_use]
    pub fn span(&self) -> Option<Range<usize>> {
        self.span.clone()
    }

    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub fn source(&self) -> MatchSource {
        self.source
    }
}

/// Unrounded conversion output. A zero hourly rate shows up here as
/// infinite hours and NaN minutes; [`TimeBreakdown::to_duration`] is the
/// checkpoint that refuses to go further with such values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBreakdown {
    pub hours: f64,
    pub minutes: f64,
}

impl TimeBreakdown {
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.hours.is_finite() && self.minutes.is_finite()
    }

    /// Converts to whole hours and minutes, or `None` if either part is
    /// infinite or NaN.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_duration(self) -> Option<TimeDuration> {
        if !self.is_finite() {
            return None;
        }
        Some(TimeDuration {
            hours: self.hours as i64,
            minutes: self.minutes as i64,
        })
    }
}

/// How long a price costs in work time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeDuration {
    pub hours: i64,
    /// `0..=59` for non-negative durations, `-59..=0` for negative ones.
    pub minutes: i64,
}

impl TimeDuration {
    #[must_use]
    pub fn new(hours: i64, minutes: i64) -> Self {
        Self { hours, minutes }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }
}
