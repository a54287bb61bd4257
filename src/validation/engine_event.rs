//! LST Master record validation.
//!
//! Rules run in a fixed order and the first violation is returned. Nothing
//! here allocates state or performs I/O, so validating the same record any
//! number of times gives the same answer.

use serde_json::{Map, Value};

use super::{expect_str, missing_fields};
use crate::models::{EngineEvent, EnginePayload, EngineStatus, SourceEngine};
use crate::sanitize::json_type_name;
use crate::{patterns, AppError, Result};

/// Top-level fields every LST Master record carries.
pub const LST_REQUIRED_FIELDS: [&str; 6] = [
    "user_id",
    "date",
    "timestamp",
    "source_engine",
    "status",
    "data",
];

const TRAINING_FIELDS: [&str; 6] = [
    "exercise_id",
    "exercise_name",
    "weight_kg",
    "reps",
    "block_id",
    "day_index",
];

const CHECKIN_FIELDS: [&str; 5] = ["weight", "mood", "soreness", "stress", "sleep"];

const CARDIO_FIELDS: [&str; 2] = ["assigned_minutes", "actual_minutes"];

/// Check a raw record against the LST Master schema.
///
/// # Errors
///
/// - `AppError::Type` if `record` is not a mapping.
/// - `AppError::Format` if `user_id`, `date` or `timestamp` has the wrong
///   shape.
/// - `AppError::Schema` for missing fields, unknown engine or status, or an
///   invalid engine payload.
pub fn validate_engine_event_format(record: &Value) -> Result<()> {
    let Value::Object(entry) = record else {
        return Err(AppError::Type(format!(
            "log entry must be a mapping, got {}",
            json_type_name(record)
        )));
    };

    let missing = missing_fields(entry, &LST_REQUIRED_FIELDS);
    if !missing.is_empty() {
        return Err(AppError::Schema(format!(
            "missing required LST Master fields: {}",
            missing.join(", ")
        )));
    }

    let user_id = expect_str(entry, "user_id")?;
    if !patterns::snowflake().is_match(user_id) {
        return Err(AppError::Format(format!(
            "user_id must be Discord snowflake format (17-19 digits), got: {user_id}"
        )));
    }

    let date = expect_str(entry, "date")?;
    if !patterns::date().is_match(date) {
        return Err(AppError::Format(format!(
            "date must be YYYY-MM-DD format, got: {date}"
        )));
    }

    let timestamp = expect_str(entry, "timestamp")?;
    if !patterns::lst_timestamp().is_match(timestamp) {
        return Err(AppError::Format(format!(
            "timestamp must be ISO 8601 UTC format ending with Z, got: {timestamp}"
        )));
    }

    let engine = parse_member::<SourceEngine>(&entry["source_engine"], "source_engine")?;
    parse_member::<EngineStatus>(&entry["status"], "status")?;

    match &entry["data"] {
        Value::Object(data) => validate_engine_data(engine, data),
        other => Err(AppError::Schema(format!(
            "data must be a mapping, got {}",
            json_type_name(other)
        ))),
    }
}

/// Validate a record and return its typed form.
///
/// # Errors
///
/// Any error from [`validate_engine_event_format`].
pub fn parse_engine_event(record: &Value) -> Result<EngineEvent> {
    validate_engine_event_format(record)?;

    let field = |name: &str| record[name].as_str().unwrap_or_default().to_owned();
    let engine = parse_member::<SourceEngine>(&record["source_engine"], "source_engine")?;
    let status = parse_member::<EngineStatus>(&record["status"], "status")?;
    let payload = EnginePayload::from_value(engine, record["data"].clone())?;

    Ok(EngineEvent::from_validated(
        field("user_id"),
        field("date"),
        field("timestamp"),
        status,
        payload,
    ))
}

/// Check an engine payload: every required field present with the right
/// JSON type. Unknown fields are ignored.
///
/// # Errors
///
/// Returns `AppError::Schema` naming the first missing or mistyped field.
pub fn validate_engine_data(engine: SourceEngine, data: &Map<String, Value>) -> Result<()> {
    match engine {
        SourceEngine::Meal => {
            if !data.contains_key("meal_id") {
                return Err(AppError::Schema(
                    "meal data must contain 'meal_id' field".into(),
                ));
            }
            expect_str(data, "meal_id")?;
        }
        SourceEngine::Training => {
            require(engine, data, &TRAINING_FIELDS)?;
            expect_str(data, "exercise_id")?;
            expect_str(data, "exercise_name")?;
            expect_number(data, "weight_kg")?;
            expect_integer(data, "reps")?;
            expect_str(data, "block_id")?;
            expect_integer(data, "day_index")?;
        }
        SourceEngine::Checkin => {
            require(engine, data, &CHECKIN_FIELDS)?;
            expect_number(data, "weight")?;
            for name in ["mood", "soreness", "stress", "sleep"] {
                expect_str(data, name)?;
            }
            if data.contains_key("notes") {
                expect_str(data, "notes")?;
            }
        }
        SourceEngine::Cardio => {
            require(engine, data, &CARDIO_FIELDS)?;
            expect_integer(data, "assigned_minutes")?;
            expect_integer(data, "actual_minutes")?;
        }
    }
    Ok(())
}

fn require(engine: SourceEngine, data: &Map<String, Value>, fields: &[&str]) -> Result<()> {
    let missing = missing_fields(data, fields);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Schema(format!(
            "{engine} data missing required fields: {}",
            missing.join(", ")
        )))
    }
}

fn parse_member<T>(value: &Value, name: &str) -> Result<T>
where
    T: std::str::FromStr<Err = AppError>,
{
    match value.as_str() {
        Some(raw) => raw.parse(),
        None => Err(AppError::Schema(format!("invalid {name}: {value}"))),
    }
}

fn expect_number(data: &Map<String, Value>, name: &str) -> Result<()> {
    match &data[name] {
        Value::Number(_) => Ok(()),
        other => Err(AppError::Schema(format!(
            "{name} must be number, got {}",
            json_type_name(other)
        ))),
    }
}

fn expect_integer(data: &Map<String, Value>, name: &str) -> Result<()> {
    match &data[name] {
        Value::Number(n) if n.is_i64() => Ok(()),
        Value::Number(n) if n.is_u64() => Err(AppError::Schema(format!(
            "{name} must be integer between {} and {}, got {n}",
            i64::MIN,
            i64::MAX
        ))),
        other => Err(AppError::Schema(format!(
            "{name} must be integer, got {}",
            json_type_name(other)
        ))),
    }
}
