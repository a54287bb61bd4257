//! PII redaction for structured log context.
//!
//! Redaction is regex-based and best-effort: it catches the common shapes
//! of e-mail addresses, phone numbers, SSNs, card numbers and IPv4
//! addresses, nothing more. When two categories overlap on the same digits
//! the category applied first wins; callers must not rely on which.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{patterns, AppError, Result};

/// Replace every PII match in `text` with its placeholder token.
#[must_use]
pub fn sanitize_string(text: &str) -> String {
    let mut out = text.to_owned();
    for (pattern, token) in patterns::pii() {
        if pattern.is_match(&out) {
            out = pattern.replace_all(&out, *token).into_owned();
        }
    }
    out
}

/// Redact every string in a JSON value.
///
/// Object keys and values are sanitized recursively. Array elements that
/// are strings are sanitized; any other element is passed through as is.
/// Numbers, booleans and null are returned unchanged.
#[must_use]
pub fn sanitize(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(sanitize_string(&text)),
        Value::Object(map) => Value::Object(sanitize_map(map)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(text) => Value::String(sanitize_string(&text)),
                    other => other,
                })
                .collect(),
        ),
        primitive => primitive,
    }
}

fn sanitize_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (sanitize_string(&key), sanitize(value)))
        .collect()
}

/// Convert any serializable value to JSON, then redact it.
///
/// # Errors
///
/// Returns `AppError::Serialization` if `value` cannot be represented as
/// JSON (for example a map with non-string keys).
pub fn sanitize_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    let json = serde_json::to_value(value).map_err(|err| {
        AppError::Serialization(format!("sanitized context is not JSON serializable: {err}"))
    })?;
    Ok(sanitize(json))
}

/// Sanitize a context mapping.
///
/// # Errors
///
/// Returns `AppError::Type` if `context` is not a JSON object.
pub fn sanitize_context(context: Value) -> Result<Map<String, Value>> {
    match context {
        Value::Object(map) => Ok(sanitize_map(map)),
        other => Err(AppError::Type(format!(
            "context must be a mapping, got {}",
            json_type_name(&other)
        ))),
    }
}

/// JSON type name used in error messages.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
