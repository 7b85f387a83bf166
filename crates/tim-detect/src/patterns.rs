//! The text pattern library: named price shapes matched against plain text.
//!
//! Each [`PatternKind`] owns one compiled regex and a fixed confidence.
//! [`extract_prices`] runs every kind in [`PATTERNS`] over the full input and
//! returns all matches, so `"From $19.99 to $29.99"` yields a candidate per
//! price (plus the contextual reading of the first one).
//!
//! Signs are accepted on either side of the currency and dropped: a page
//! showing `-$100.00` or `$-100.00` is still talking about a $100 amount.

use std::cmp::Reverse;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tim_core::{currency, MatchSource, NumberFormat, PriceMatch};

use crate::normalize::{join_components, normalize_amount};

/// A digit run with optional grouping or decimal separators between digit groups.
const NUMBER: &str = r"[0-9]+(?:[.,'’\x{a0}\x{202f}][0-9]+)*";

/// Optional minus sign, dropped from the value.
const SIGN: &str = r"(?:-\s?)?";

const CONTEXT_WORDS: &str =
    r"from|under|over|starting at|starts at|as low as|only|just|up to|below|less than";

static CURRENCY: LazyLock<String> = LazyLock::new(currency_alternation);

static CURRENCY_BEFORE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{SIGN}(?P<cur>{cur})\s{{0,2}}{SIGN}(?P<num>{NUMBER})",
        cur = CURRENCY.as_str()
    ))
    .expect("valid currency-before regex")
});

static CURRENCY_AFTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{SIGN}\b(?P<num>{NUMBER})\s{{0,2}}(?P<cur>{cur})",
        cur = CURRENCY.as_str()
    ))
    .expect("valid currency-after regex")
});

static SPLIT_COMPONENTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{SIGN}(?P<cur>{cur})\s{{0,2}}(?P<int>[0-9]{{1,3}}(?:[.,'’][0-9]{{3}})*|[0-9]+)[.,]?\s+(?P<frac>[0-9]{{2}})\b",
        cur = CURRENCY.as_str()
    ))
    .expect("valid split-components regex")
});

static CONTEXTUAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i:\b(?:{CONTEXT_WORDS}))\s+(?:(?P<cur>{cur})\s{{0,2}}(?P<num>{NUMBER})|(?P<num_after>{NUMBER})\s{{0,2}}(?P<cur_after>{cur}))",
        cur = CURRENCY.as_str()
    ))
    .expect("valid contextual regex")
});

/// Builds a regex alternation of every known currency symbol and code,
/// longest first. ASCII alphanumeric edges get word boundaries so `"kr"`
/// does not fire inside `"kraft"`.
fn currency_alternation() -> String {
    let parts: Vec<String> = currency::tokens_longest_first()
        .into_iter()
        .map(|token| {
            let mut part = String::new();
            if token.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
                part.push_str(r"\b");
            }
            part.push_str(&regex::escape(token));
            if token.chars().last().is_some_and(|c| c.is_ascii_alphanumeric()) {
                part.push_str(r"\b");
            }
            part
        })
        .collect();
    format!("(?:{})", parts.join("|"))
}

/// A named price shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// `$19.99`, `USD 19.99`, `-$100.00`
    CurrencyBefore,
    /// `19,99 €`, `100 kr`, `5 USD`
    CurrencyAfter,
    /// `$19 99`: integer and cents rendered as separate runs.
    SplitComponents,
    /// `under $20`, `starting at 9,99 €`
    Contextual,
}

/// Every pattern, in the order they are run.
pub const PATTERNS: [PatternKind; 4] = [
    PatternKind::CurrencyBefore,
    PatternKind::CurrencyAfter,
    PatternKind::SplitComponents,
    PatternKind::Contextual,
];

impl PatternKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PatternKind::CurrencyBefore => "currency-before",
            PatternKind::CurrencyAfter => "currency-after",
            PatternKind::SplitComponents => "split-components",
            PatternKind::Contextual => "contextual",
        }
    }

    #[must_use]
    pub fn confidence(self) -> f64 {
        match self {
            PatternKind::CurrencyBefore
            | PatternKind::CurrencyAfter
            | PatternKind::SplitComponents => 0.9,
            PatternKind::Contextual => 0.7,
        }
    }

    #[must_use]
    pub fn source(self) -> MatchSource {
        match self {
            PatternKind::Contextual => MatchSource::Contextual,
            _ => MatchSource::TextPattern,
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            PatternKind::CurrencyBefore => &CURRENCY_BEFORE_RE,
            PatternKind::CurrencyAfter => &CURRENCY_AFTER_RE,
            PatternKind::SplitComponents => &SPLIT_COMPONENTS_RE,
            PatternKind::Contextual => &CONTEXTUAL_RE,
        }
    }

    /// Scans all of `text` and returns every match of this pattern.
    #[must_use]
    pub fn find_all(self, text: &str, format: &NumberFormat) -> Vec<PriceMatch> {
        self.regex()
            .captures_iter(text)
            .filter_map(|caps| self.build_match(text, &caps, format))
            .collect()
    }

    fn build_match(
        self,
        text: &str,
        caps: &Captures<'_>,
        format: &NumberFormat,
    ) -> Option<PriceMatch> {
        let whole = caps.get(0)?;
        let rest = &text[whole.end()..];
        let mut end = whole.end();

        let (currency, value) = match self {
            PatternKind::CurrencyBefore => {
                let num = caps.name("num")?;
                end = num.start() + known_number_len(num.as_str(), format);
                (
                    caps.name("cur")?.as_str(),
                    normalize_amount(&text[num.start()..end], format)?,
                )
            }
            PatternKind::CurrencyAfter => {
                // "2 $5": the symbol belongs to the amount that follows it.
                if next_non_space(rest).is_some_and(|c| c.is_ascii_digit()) {
                    return None;
                }
                let num = caps.name("num")?.as_str();
                if known_number_len(num, format) != num.len() {
                    return None;
                }
                (caps.name("cur")?.as_str(), normalize_amount(num, format)?)
            }
            PatternKind::SplitComponents => {
                // "$5 20%", "$5 10 items" and "$5 99.50" are not split cents.
                if next_non_space(rest).is_some_and(|c| c.is_alphanumeric() || c == '%')
                    || continues_number(rest)
                {
                    return None;
                }
                (
                    caps.name("cur")?.as_str(),
                    join_components(
                        caps.name("int")?.as_str(),
                        Some(caps.name("frac")?.as_str()),
                        format,
                    )?,
                )
            }
            PatternKind::Contextual => {
                if let (Some(cur), Some(num)) = (caps.name("cur"), caps.name("num")) {
                    end = num.start() + known_number_len(num.as_str(), format);
                    (
                        cur.as_str(),
                        normalize_amount(&text[num.start()..end], format)?,
                    )
                } else {
                    let num = caps.name("num_after")?.as_str();
                    if known_number_len(num, format) != num.len() {
                        return None;
                    }
                    (
                        caps.name("cur_after")?.as_str(),
                        normalize_amount(num, format)?,
                    )
                }
            }
        };

        let span = whole.start()..end;
        PriceMatch::new(value, currency, &text[span.clone()], self.confidence(), self.source())
            .map(|m| m.with_span(span))
    }
}

/// Byte length of the leading part of `num` that `format` can read: digits
/// and the separators it knows. An unknown separator ends the number, so
/// `"5'000"` under US rules reads as `5`.
fn known_number_len(num: &str, format: &NumberFormat) -> usize {
    let mut end = 0;
    for (i, c) in num.char_indices() {
        if c.is_ascii_digit() {
            end = i + c.len_utf8();
        } else if !(format.is_thousands(c) || format.is_decimal(c) || c.is_whitespace()) {
            break;
        }
    }
    end
}

fn next_non_space(s: &str) -> Option<char> {
    s.chars().find(|c| !c.is_whitespace())
}

/// `true` when `s` opens with a separator followed by a digit.
fn continues_number(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some('.' | ',' | '\''))
        && chars.next().is_some_and(|c| c.is_ascii_digit())
}

/// Runs every pattern over `text` and returns all matches ordered by start
/// position, longer spans first when two start together. Empty input yields
/// an empty vec.
#[must_use]
pub fn extract_prices(text: &str, format: &NumberFormat) -> Vec<PriceMatch> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<PriceMatch> = PATTERNS
        .iter()
        .flat_map(|kind| kind.find_all(text, format))
        .collect();

    matches.sort_by_key(|m| {
        let span = m.span().unwrap_or(0..0);
        (span.start, Reverse(span.end))
    });
    matches
}

/// The leftmost price in `text` whose currency is `target`, if any.
#[must_use]
pub fn first_price(text: &str, format: &NumberFormat, target: &str) -> Option<PriceMatch> {
    extract_prices(text, format)
        .into_iter()
        .find(|m| currency::matches_target(m.currency(), target))
}

static ANY_CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CURRENCY.as_str()).expect("valid currency regex"));

/// Finds the first currency token in `text`.
#[must_use]
pub fn find_currency(text: &str) -> Option<&str> {
    ANY_CURRENCY_RE.find(text).map(|m| m.as_str())
}

/// Returns `true` if `text` contains any known currency symbol or code.
/// Cheap pre-filter for scanners deciding which nodes are worth analyzing.
#[must_use]
pub fn mentions_currency(text: &str) -> bool {
    ANY_CURRENCY_RE.is_match(text)
}

#[cfg(test)]
#[path = "patterns_test.rs"]
mod tests;
