//! System Log record validation.

use serde_json::{Map, Value};

use super::{expect_str, missing_fields};
use crate::models::{status::join, LogLevel, SystemStatus};
use crate::sanitize::json_type_name;
use crate::{patterns, timestamp, AppError, Result};

/// Fields every System Log record carries.
pub const SYSTEM_REQUIRED_FIELDS: [&str; 5] =
    ["timestamp", "level", "module", "message", "trace_id"];

/// Deepest mapping nesting accepted in `context`.
pub const MAX_CONTEXT_DEPTH: usize = 5;

/// Check a serialized System Log record.
///
/// # Errors
///
/// - `AppError::Type` if `record` is not a mapping.
/// - `AppError::Schema` for missing fields, bad level or status, an empty
///   module, a malformed `user_id` or an over-deep context.
/// - `AppError::Format` for an unparseable timestamp.
pub fn validate_log_format(record: &Value) -> Result<()> {
    let Value::Object(entry) = record else {
        return Err(AppError::Type(format!(
            "log entry must be a mapping, got {}",
            json_type_name(record)
        )));
    };

    let missing = missing_fields(entry, &SYSTEM_REQUIRED_FIELDS);
    if !missing.is_empty() {
        return Err(AppError::Schema(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    let level = expect_str(entry, "level")?;
    if !LogLevel::ALL.iter().any(|known| known.as_str() == level) {
        return Err(AppError::Schema(format!(
            "invalid log level: {level}. Must be one of {}",
            join(LogLevel::ALL.iter().map(|known| known.as_str()))
        )));
    }

    let raw_timestamp = expect_str(entry, "timestamp")?;
    timestamp::to_utc(raw_timestamp)?;

    expect_str(entry, "trace_id")?;

    if expect_str(entry, "module")?.trim().is_empty() {
        return Err(AppError::Schema("module must be non-empty string".into()));
    }

    expect_str(entry, "message")?;

    if entry.contains_key("user_id") {
        validate_user_id(&entry["user_id"])?;
    }

    if entry.contains_key("status") {
        expect_str(entry, "status")?.parse::<SystemStatus>()?;
    }

    if let Some(context) = entry.get("context") {
        validate_context(context)?;
    }

    Ok(())
}

fn validate_user_id(value: &Value) -> Result<()> {
    let Value::String(user_id) = value else {
        return Err(AppError::Schema(format!(
            "user_id must be string, got {}",
            json_type_name(value)
        )));
    };
    if user_id.trim().is_empty() {
        return Err(AppError::Schema("user_id cannot be empty".into()));
    }
    if !patterns::snowflake().is_match(user_id) {
        return Err(AppError::Format(format!(
            "user_id must be Discord snowflake format (17-19 digits), got: {user_id}"
        )));
    }
    Ok(())
}

fn validate_context(context: &Value) -> Result<()> {
    let Value::Object(map) = context else {
        return Err(AppError::Schema(format!(
            "context must be a mapping, got {}",
            json_type_name(context)
        )));
    };
    if depth(map) > MAX_CONTEXT_DEPTH {
        return Err(AppError::Schema(format!(
            "context nesting too deep (max {MAX_CONTEXT_DEPTH} levels)"
        )));
    }
    Ok(())
}

/// Mapping nesting depth: `{}` is 0, `{"a": 1}` is 1, `{"a": {"b": 1}}` is 2.
/// Arrays are leaves.
pub(crate) fn depth(map: &Map<String, Value>) -> usize {
    map.values()
        .map(|value| match value {
            Value::Object(inner) => 1 + depth(inner),
            _ => 1,
        })
        .max()
        .unwrap_or(0)
}
