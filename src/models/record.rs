//! The two record shapes written to sinks.

use serde::Serialize;
use serde_json::{Map, Value};

use super::engine::{EnginePayload, SourceEngine};
use super::level::LogLevel;
use super::status::{EngineStatus, SystemStatus};

/// A validated LST Master record.
///
/// Only obtainable through [`crate::validation::parse_engine_event`], so a
/// value of this type always satisfies the schema. Field order on the wire
/// is `user_id, date, timestamp, source_engine, status, data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineEvent {
    user_id: String,
    date: String,
    timestamp: String,
    source_engine: SourceEngine,
    status: EngineStatus,
    data: EnginePayload,
}

impl EngineEvent {
    pub(crate) fn from_validated(
        user_id: String,
        date: String,
        timestamp: String,
        status: EngineStatus,
        data: EnginePayload,
    ) -> Self {
        Self {
            user_id,
            date,
            timestamp,
            source_engine: data.engine(),
            status,
            data,
        }
    }

    /// Discord snowflake of the client.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Client-local calendar date, `YYYY-MM-DD`.
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// UTC instant with trailing `Z`.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Producing engine.
    #[must_use]
    pub fn source_engine(&self) -> SourceEngine {
        self.source_engine
    }

    /// Event outcome.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        self.status
    }

    /// Engine payload.
    #[must_use]
    pub fn data(&self) -> &EnginePayload {
        &self.data
    }
}

/// Error details attached to a System Log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionInfo {
    /// Rust type name of the error.
    #[serde(rename = "type")]
    pub kind: String,
    /// `Display` rendering of the error.
    pub message: String,
    /// `Display` renderings of each `source()` in order.
    pub chain: Vec<String>,
}

impl ExceptionInfo {
    /// Capture an error and its source chain.
    #[must_use]
    pub fn capture<E: std::error::Error + ?Sized>(error: &E) -> Self {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        Self {
            kind: short_type_name::<E>().to_owned(),
            message: error.to_string(),
            chain,
        }
    }
}

/// Last path segment of a type name (`std::io::Error` becomes `Error`).
/// Trait objects report their principal trait.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let full = full.strip_prefix("dyn ").unwrap_or(full);
    let base = full.split(['<', ' ']).next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Operational (non-LST) log record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemLogRecord {
    /// UTC instant with `+00:00` offset.
    pub timestamp: String,
    /// Severity.
    pub level: LogLevel,
    /// Sink name the record was emitted to.
    pub module: String,
    /// Human-readable description.
    pub message: String,
    /// Correlation token.
    pub trace_id: String,
    /// Sanitized structured context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
    /// Client snowflake, when the record concerns one client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Failing engine for failure records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_name: Option<String>,
    /// Event kind for missed-event records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Operational status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SystemStatus>,
    /// Error details for failure records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionInfo>,
}
