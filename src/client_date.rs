//! Client-local calendar date derivation.
//!
//! Offsets are whole hours applied as a flat shift: no daylight saving and
//! no half-hour zones.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{patterns, AppError, Result};

/// Largest accepted offset magnitude in hours.
pub const MAX_OFFSET_HOURS: i64 = 14;

/// Parsed `UTC±N` client offset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TimezoneOffset {
    hours: i64,
}

impl TimezoneOffset {
    /// Signed offset in hours.
    #[must_use]
    pub fn hours(self) -> i64 {
        self.hours
    }

    /// Shift a UTC instant to the client's wall clock and take its date.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Range` if the shifted instant falls outside the
    /// representable calendar.
    pub fn local_date(self, utc: DateTime<Utc>) -> Result<NaiveDate> {
        utc.checked_add_signed(Duration::hours(self.hours))
            .map(|local| local.date_naive())
            .ok_or_else(|| {
                AppError::Range(format!(
                    "timestamp {utc} shifted by {self} is outside the supported date range"
                ))
            })
    }
}

impl FromStr for TimezoneOffset {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self> {
        let captures = patterns::timezone_offset().captures(raw).ok_or_else(|| {
            AppError::Format(format!("timezone_offset must be UTC±X format, got: {raw}"))
        })?;
        let magnitude: i64 = captures[2].parse().map_err(|_| {
            AppError::Format(format!("timezone_offset must be UTC±X format, got: {raw}"))
        })?;
        if magnitude > MAX_OFFSET_HOURS {
            return Err(AppError::Range(format!(
                "timezone_offset hours must be <= {MAX_OFFSET_HOURS}, got: {magnitude}"
            )));
        }
        let hours = if &captures[1] == "-" {
            -magnitude
        } else {
            magnitude
        };
        Ok(Self { hours })
    }
}

impl Display for TimezoneOffset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.hours < 0 { '-' } else { '+' };
        write!(f, "UTC{sign}{}", self.hours.abs())
    }
}

/// Client-local date (`YYYY-MM-DD`) for `utc_timestamp`.
///
/// With no offset the UTC calendar date is returned.
///
/// # Errors
///
/// Returns `AppError::Format` if the offset is not `UTC±N`, or
/// `AppError::Range` if `N` exceeds [`MAX_OFFSET_HOURS`] or the shifted
/// instant leaves the representable calendar.
pub fn calculate_client_date(
    utc_timestamp: DateTime<Utc>,
    timezone_offset: Option<&str>,
) -> Result<String> {
    let date = match timezone_offset {
        None => utc_timestamp.date_naive(),
        Some(raw) => raw.parse::<TimezoneOffset>()?.local_date(utc_timestamp)?,
    };
    Ok(date.format("%Y-%m-%d").to_string())
}
