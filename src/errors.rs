//! Error types shared across the logging layer.

use std::fmt::{Display, Formatter};

/// Shared result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error enumeration covering every way a logging call can be refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Timestamp, date, identifier or offset has the wrong shape.
    Format(String),
    /// Value is well-formed but outside the accepted range.
    Range(String),
    /// Record is not a mapping.
    Type(String),
    /// Missing or invalid field, bad engine payload, bad level or status.
    Schema(String),
    /// Value cannot be represented as JSON.
    Serialization(String),
    /// Sink directory, file or console failure.
    Io(String),
    /// Configuration parsing or validation failure.
    Config(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format(msg) => write!(f, "format: {msg}"),
            Self::Range(msg) => write!(f, "range: {msg}"),
            Self::Type(msg) => write!(f, "type: {msg}"),
            Self::Schema(msg) => write!(f, "schema: {msg}"),
            Self::Serialization(msg) => write!(f, "serialization: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
