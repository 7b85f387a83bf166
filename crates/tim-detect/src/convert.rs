//! Price to work-time conversion and the annotated display string.
//!
//! [`convert_price_to_time_string`] is total: any problem with the input,
//! the number format or the wage leaves the text exactly as it was. The
//! reason is available as a [`ConversionError`] through [`try_convert`] and
//! is logged at debug level by the infallible wrapper.

use tim_core::{
    NumberFormat, PriceMatch, TimeBreakdown, TimeDuration, TimeFormat, WageConfig, WageFrequency,
};

use crate::error::ConversionError;
use crate::patterns::first_price;

/// 40 hours a week, 52 weeks a year.
pub const WORK_HOURS_PER_YEAR: f64 = 2080.0;

/// Hourly rate for a wage `amount` given per `frequency`.
///
/// Yearly amounts are divided by [`WORK_HOURS_PER_YEAR`]; a missing
/// frequency is treated as hourly. Non-numeric amounts give NaN, which
/// callers must check for.
#[must_use]
pub fn calculate_hourly_wage(frequency: Option<WageFrequency>, amount: &str) -> f64 {
    let amount: f64 = amount.trim().parse().unwrap_or(f64::NAN);
    match frequency {
        Some(WageFrequency::Yearly) => amount / WORK_HOURS_PER_YEAR,
        Some(WageFrequency::Hourly) | None => amount,
    }
}

/// Splits `price / hourly_rate` into whole hours and rounded minutes.
///
/// Minutes are rounded half away from zero and a rounded 60 carries into
/// the hours. Both parts take the sign of the quotient, so a negative price
/// at a positive rate gives `-1h -30m` style output and two negatives cancel.
/// A zero rate gives infinite hours and NaN minutes.
#[must_use]
pub fn convert_to_time(price: f64, hourly_rate: f64) -> TimeBreakdown {
    let total = price / hourly_rate;
    if !total.is_finite() {
        return TimeBreakdown {
            hours: total,
            minutes: f64::NAN,
        };
    }

    let mut hours = total.trunc();
    let mut minutes = ((total - hours) * 60.0).round();
    if minutes.abs() >= 60.0 {
        hours += minutes.signum();
        minutes = 0.0;
    }
    TimeBreakdown { hours, minutes }
}

/// Verbose form: `"2 hours, 30 minutes"`. Zero parts are left out, except
/// that a zero duration reads `"0 minutes"`.
#[must_use]
pub fn format_time_snippet(hours: i64, minutes: i64) -> String {
    let mut parts = Vec::with_capacity(2);
    if hours != 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes != 0 {
        parts.push(unit(minutes, "minute"));
    }
    if parts.is_empty() {
        return "0 minutes".to_string();
    }
    parts.join(", ")
}

fn unit(n: i64, name: &str) -> String {
    if n.abs() == 1 {
        format!("{n} {name}")
    } else {
        format!("{n} {name}s")
    }
}

/// Compact form: `"2h 30m"`, both parts always present.
#[must_use]
pub fn format_time_compact(hours: i64, minutes: i64) -> String {
    format!("{hours}h {minutes}m")
}

#[must_use]
pub fn format_time(hours: i64, minutes: i64, format: TimeFormat) -> String {
    match format {
        TimeFormat::Compact => format_time_compact(hours, minutes),
        TimeFormat::Verbose => format_time_snippet(hours, minutes),
    }
}

/// `"{price} ({time})"`. A missing price renders as the literal `null`.
#[must_use]
pub fn format_price_with_time(
    price: Option<&str>,
    hours: i64,
    minutes: i64,
    format: TimeFormat,
) -> String {
    let price = price.unwrap_or("null");
    format!("{price} ({})", format_time(hours, minutes, format))
}

/// A successfully annotated string and what went into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotated {
    pub text: String,
    pub price: PriceMatch,
    pub duration: TimeDuration,
    /// Byte offset in the input where the annotation was inserted.
    pub insert_at: usize,
}

/// Annotates the first price in `text` that is in the wage's currency with
/// its work-time cost, in compact form. Returns `text` unchanged when anything needed is missing or
/// unusable.
#[must_use]
pub fn convert_price_to_time_string(
    text: &str,
    formatters: Option<&NumberFormat>,
    wage: Option<&WageConfig>,
) -> String {
    convert_price_to_time_string_with_format(text, formatters, wage, TimeFormat::Compact)
}

#[must_use]
pub fn convert_price_to_time_string_with_format(
    text: &str,
    formatters: Option<&NumberFormat>,
    wage: Option<&WageConfig>,
    time_format: TimeFormat,
) -> String {
    match try_convert(text, formatters, wage, time_format) {
        Ok(annotated) => annotated.text,
        Err(error) => {
            tracing::debug!(%error, "text left unannotated");
            text.to_string()
        }
    }
}

/// Fallible core of [`convert_price_to_time_string`].
///
/// # Errors
///
/// Returns a [`ConversionError`] naming the first reason the text cannot be
/// annotated.
pub fn try_convert(
    text: &str,
    formatters: Option<&NumberFormat>,
    wage: Option<&WageConfig>,
    time_format: TimeFormat,
) -> Result<Annotated, ConversionError> {
    if text.trim().is_empty() {
        return Err(ConversionError::EmptyInput);
    }
    let formatters = formatters.ok_or(ConversionError::MissingFormatters)?;
    let wage = wage.ok_or(ConversionError::MissingWage)?;
    let rate = hourly_rate(wage)?;

    let price = first_price(text, formatters, &wage.currency_code).ok_or_else(|| {
        ConversionError::NoPrice {
            text: text.to_string(),
        }
    })?;
    annotate_match(text, &price, rate, time_format)
}

/// Hourly rate for `wage`, rejecting missing, non-numeric, zero and
/// negative amounts.
///
/// # Errors
///
/// Returns [`ConversionError::InvalidWage`] when the rate is not a positive
/// finite number.
pub fn hourly_rate(wage: &WageConfig) -> Result<f64, ConversionError> {
    let rate = calculate_hourly_wage(wage.frequency, &wage.amount);
    if wage.is_amount_missing() || !rate.is_finite() || rate <= 0.0 {
        return Err(ConversionError::InvalidWage {
            amount: wage.amount.clone(),
        });
    }
    Ok(rate)
}

/// Inserts the time annotation for `price` into `text`.
///
/// The annotation goes right after the matched price when `price` carries
/// a span into `text`; otherwise after the first occurrence of its original
/// text, or at the end.
///
/// # Errors
///
/// Returns [`ConversionError::NonFiniteTime`] for a degenerate rate and
/// [`ConversionError::AlreadyAnnotated`] when the price is already followed
/// by the annotation this call would add, in either time format.
pub fn annotate_match(
    text: &str,
    price: &PriceMatch,
    rate: f64,
    time_format: TimeFormat,
) -> Result<Annotated, ConversionError> {
    let amount = price.value_f64();
    let duration = convert_to_time(amount, rate)
        .to_duration()
        .ok_or(ConversionError::NonFiniteTime {
            price: amount,
            rate,
        })?;

    let insert_at = insertion_point(text, price);
    let (head, tail) = text.split_at(insert_at);
    if is_followed_by_annotation(tail, duration) {
        return Err(ConversionError::AlreadyAnnotated);
    }

    let annotated =
        format_price_with_time(Some(head), duration.hours, duration.minutes, time_format);
    Ok(Annotated {
        text: format!("{annotated}{tail}"),
        price: price.clone(),
        duration,
        insert_at,
    })
}

fn is_followed_by_annotation(tail: &str, duration: TimeDuration) -> bool {
    [TimeFormat::Compact, TimeFormat::Verbose].into_iter().any(|format| {
        let annotation = format_time(duration.hours, duration.minutes, format);
        tail.strip_prefix(" (")
            .and_then(|rest| rest.strip_prefix(annotation.as_str()))
            .is_some_and(|rest| rest.starts_with(')'))
    })
}

fn insertion_point(text: &str, price: &PriceMatch) -> usize {
    let original = price.original_text();
    price
        .span()
        .filter(|span| text.get(span.clone()) == Some(original))
        .map(|span| span.end)
        .or_else(|| {
            (!original.is_empty())
                .then(|| text.find(original).map(|start| start + original.len()))
                .flatten()
        })
        .unwrap_or(text.len())
}

#[cfg(test)]
#[path = "convert_test.rs"]
mod tests;
