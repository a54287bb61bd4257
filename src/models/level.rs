//! Severity levels shared by System Log records and sink thresholds.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::AppError;

/// Record severity, ordered from least to most severe.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize,
    Deserialize,
)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum LogLevel {
    /// Decision points and intermediate values.
    Debug,
    /// Normal completions.
    #[default]
    Info,
    /// Missed or underperformed events.
    Warning,
    /// Failed events.
    Error,
    /// Logger breakdowns.
    Critical,
}

impl LogLevel {
    /// Every accepted level, in ascending severity.
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    /// Canonical upper-case name as written to records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|level| level.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a level name case-insensitively (`"warning"`, `"WARNING"`).
impl FromStr for LogLevel {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let upper = raw.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == upper)
            .ok_or_else(|| {
                AppError::Schema(format!(
                    "invalid log level: {raw}. Must be one of {}",
                    Self::expected()
                ))
            })
    }
}

impl TryFrom<String> for LogLevel {
    type Error = AppError;

    fn try_from(raw: String) -> Result<Self, AppError> {
        raw.parse()
    }
}
