//! ISO 8601 UTC timestamp normalization.
//!
//! Native datetimes and strings are treated differently on purpose: a naive
//! `NaiveDateTime` is assumed to already be UTC and is only labeled, while a
//! string without an offset is rejected. Callers holding a naive string they
//! know to be UTC must parse it themselves and pass the `NaiveDateTime`.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::{AppError, Result};

const REQUIRED_SHAPE: &str = "Must be ISO 8601 UTC with offset";

const ZONED_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
];

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A timestamp as handed over by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampInput {
    /// Datetime without zone; assumed UTC.
    Naive(NaiveDateTime),
    /// Datetime with a zone; converted to UTC.
    Zoned(DateTime<FixedOffset>),
    /// ISO 8601 text; must carry an offset or `Z`.
    Text(String),
}

impl From<NaiveDateTime> for TimestampInput {
    fn from(value: NaiveDateTime) -> Self {
        Self::Naive(value)
    }
}

impl From<DateTime<FixedOffset>> for TimestampInput {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Zoned(value)
    }
}

impl From<DateTime<Utc>> for TimestampInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Zoned(value.fixed_offset())
    }
}

impl From<DateTime<Local>> for TimestampInput {
    fn from(value: DateTime<Local>) -> Self {
        Self::Zoned(value.fixed_offset())
    }
}

impl From<&str> for TimestampInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for TimestampInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Resolve any accepted input to a UTC instant.
///
/// # Errors
///
/// Returns `AppError::Format` if a string does not parse as ISO 8601 or
/// carries no timezone information.
pub fn to_utc(input: impl Into<TimestampInput>) -> Result<DateTime<Utc>> {
    match input.into() {
        TimestampInput::Naive(naive) => Ok(naive.and_utc()),
        TimestampInput::Zoned(zoned) => Ok(zoned.with_timezone(&Utc)),
        TimestampInput::Text(text) => parse_text(&text),
    }
}

/// Normalize to the System Log representation, e.g.
/// `2025-01-27T22:00:00+00:00`.
///
/// # Errors
///
/// Same as [`to_utc`].
pub fn enforce_timestamp_format(input: impl Into<TimestampInput>) -> Result<String> {
    to_utc(input).map(format_offset)
}

/// Render with an explicit `+00:00` suffix. Fractional seconds appear only
/// when non-zero.
#[must_use]
pub fn format_offset(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Render with a trailing `Z`, as the LST Master record requires.
#[must_use]
pub fn format_lst(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_text(text: &str) -> Result<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let normalized = match trimmed.strip_suffix(['Z', 'z']) {
        Some(stem) => format!("{stem}+00:00"),
        None => trimmed.to_owned(),
    };
    for format in ZONED_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(&normalized, format) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(trimmed, format).is_ok())
        || NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok();
    let reason = if naive {
        "timestamp must include timezone information"
    } else {
        "not an ISO 8601 datetime"
    };
    Err(AppError::Format(format!(
        "invalid timestamp format: {text}. {REQUIRED_SHAPE}. Error: {reason}"
    )))
}
