//! End-to-end emission of operational System Log records.

use serde_json::json;

use regiment_log::models::LogLevel;
use regiment_log::validation::validate_log_format;
use regiment_log::{AppError, SystemEvent};

use super::test_helpers::{harness, harness_with_level, USER_ID};

#[test]
fn record_goes_to_default_module_with_generated_trace_id() {
    let h = harness();
    h.logger
        .log_event(SystemEvent::new("INFO", "scheduler tick"))
        .expect("valid event");

    let records = h.file_records("system");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    validate_log_format(record).expect("written line is valid");
    assert_eq!(record["module"], "system");
    assert_eq!(record["level"], "INFO");
    assert_eq!(record["message"], "scheduler tick");
    let trace_id = record["trace_id"].as_str().expect("trace id string");
    assert!(uuid::Uuid::parse_str(trace_id).is_ok(), "{trace_id}");
    assert!(record["timestamp"]
        .as_str()
        .expect("timestamp string")
        .ends_with("+00:00"));
    assert!(record.get("context").is_none());
}

#[test]
fn caller_trace_id_and_module_are_kept() {
    let h = harness();
    h.logger
        .log_event(
            SystemEvent::new("warning", "delivery retried")
                .with_module("meal_delivery")
                .with_trace_id("req-77")
                .with_user(USER_ID),
        )
        .expect("valid event");

    let records = h.file_records("meal_delivery");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["trace_id"], "req-77");
    assert_eq!(records[0]["level"], "WARNING");
    assert_eq!(records[0]["user_id"], USER_ID);
}

#[test]
fn context_is_sanitized_before_writing() {
    let h = harness();
    h.logger
        .log_event(SystemEvent::new("INFO", "contact updated").with_context(json!({
            "old": "coach@regiment.fit",
            "nested": {"phone": "call 555-123-4567"},
            "attempt": 2,
        })))
        .expect("valid event");

    let record = &h.file_records("system")[0];
    assert_eq!(record["context"]["old"], "[EMAIL_REDACTED]");
    assert_eq!(record["context"]["nested"]["phone"], "call [PHONE_REDACTED]");
    assert_eq!(record["context"]["attempt"], 2);
    assert!(!h.console.lines()[0].contains("coach@regiment.fit"));
}

#[test]
fn invalid_level_is_rejected_before_writing() {
    let h = harness();
    let err = h
        .logger
        .log_event(SystemEvent::new("LOUD", "nope"))
        .expect_err("bad level");
    assert!(matches!(err, AppError::Schema(_)));
    assert!(h.console.lines().is_empty());
    assert!(!h.logger.registry().contains("system"));
}

#[test]
fn non_mapping_context_is_a_type_error() {
    let h = harness();
    let err = h
        .logger
        .log_event(SystemEvent::new("INFO", "x").with_context(json!(["a"])))
        .expect_err("array context");
    assert!(matches!(err, AppError::Type(_)));
}

#[test]
fn bad_user_id_is_rejected() {
    let h = harness();
    let err = h
        .logger
        .log_event(SystemEvent::new("INFO", "x").with_user("not-a-snowflake"))
        .expect_err("bad user");
    assert!(matches!(err, AppError::Format(_)));
    assert!(h.file_records("system").is_empty());
}

#[test]
fn too_deep_context_is_rejected() {
    let h = harness();
    let deep = json!({"a": {"b": {"c": {"d": {"e": {"f": 1}}}}}});
    let err = h
        .logger
        .log_event(SystemEvent::new("INFO", "x").with_context(deep))
        .expect_err("depth 6");
    assert!(err.to_string().contains("too deep"));
}

#[test]
fn records_below_sink_level_are_dropped() {
    let h = harness_with_level(LogLevel::Warning);
    h.logger
        .log_event(SystemEvent::new("DEBUG", "noise"))
        .expect("dropped, not an error");
    h.logger
        .log_event(SystemEvent::new("INFO", "still noise"))
        .expect("dropped, not an error");
    h.logger
        .log_event(SystemEvent::new("ERROR", "signal"))
        .expect("written");

    let records = h.file_records("system");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["message"], "signal");
}

#[test]
fn lower_case_input_level_is_written_upper_case() {
    let h = harness();
    h.logger
        .log_event(SystemEvent::new("error", "disk nearly full"))
        .expect("input level is case-insensitive");
    let record = &h.file_records("system")[0];
    assert_eq!(record["level"], "ERROR");
    validate_log_format(record).expect("written level is canonical");
}
