//! Schema enforcement for both record shapes.

pub mod engine_event;
pub mod system_log;

use serde_json::{Map, Value};

use crate::sanitize::json_type_name;
use crate::{AppError, Result};

pub use engine_event::{
    parse_engine_event, validate_engine_data, validate_engine_event_format, LST_REQUIRED_FIELDS,
};
pub use system_log::{validate_log_format, MAX_CONTEXT_DEPTH, SYSTEM_REQUIRED_FIELDS};

/// Names from `required` absent in `map`, in `required` order.
fn missing_fields<'a>(map: &Map<String, Value>, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|name| !map.contains_key(*name))
        .collect()
}

/// Borrow a present field as a string.
fn expect_str<'m>(map: &'m Map<String, Value>, name: &str) -> Result<&'m str> {
    match map.get(name) {
        Some(Value::String(text)) => Ok(text),
        Some(other) => Err(AppError::Schema(format!(
            "{name} must be string, got {}",
            json_type_name(other)
        ))),
        None => Err(AppError::Schema(format!("{name} is required"))),
    }
}
