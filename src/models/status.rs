//! Status vocabularies.
//!
//! The System Log and the LST Master record both carry a `status` field but
//! accept different value sets, so each gets its own type. `pending` and
//! `skipped` have no engine-event meaning and `underperformed` has no
//! operational-log meaning.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::level::LogLevel;
use crate::AppError;

/// Status attached to an operational System Log record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    /// Work finished.
    Completed,
    /// Work raised an error.
    Failed,
    /// Scheduled work never happened.
    Missed,
    /// Work is queued.
    Pending,
    /// Work was intentionally not run.
    Skipped,
}

impl SystemStatus {
    /// Every accepted value.
    pub const ALL: [Self; 5] = [
        Self::Completed,
        Self::Failed,
        Self::Missed,
        Self::Pending,
        Self::Skipped,
    ];

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Missed => "missed",
            Self::Pending => "pending",
            Self::Skipped => "skipped",
        }
    }
}

impl Display for SystemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemStatus {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .ok_or_else(|| {
                AppError::Schema(format!(
                    "invalid status: {raw}. Must be one of {}",
                    join(Self::ALL.iter().map(|s| s.as_str()))
                ))
            })
    }
}

/// Outcome of an engine event in the LST Master record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    /// Client did the thing.
    Completed,
    /// Client did not do the thing.
    Missed,
    /// Client did part of the thing.
    Underperformed,
    /// The engine itself broke.
    Failed,
}

impl EngineStatus {
    /// Every accepted value.
    pub const ALL: [Self; 4] = [
        Self::Completed,
        Self::Missed,
        Self::Underperformed,
        Self::Failed,
    ];

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Missed => "missed",
            Self::Underperformed => "underperformed",
            Self::Failed => "failed",
        }
    }

    /// Severity an event with this status is emitted at.
    #[must_use]
    pub fn severity(self) -> LogLevel {
        match self {
            Self::Failed => LogLevel::Error,
            Self::Missed | Self::Underperformed => LogLevel::Warning,
            Self::Completed => LogLevel::Info,
        }
    }
}

impl Display for EngineStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineStatus {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .ok_or_else(|| {
                AppError::Schema(format!(
                    "invalid status: {raw}. Must be one of {}",
                    join(Self::ALL.iter().map(|s| s.as_str()))
                ))
            })
    }
}

pub(crate) fn join<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}
