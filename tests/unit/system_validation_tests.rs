//! Unit tests for System Log record validation.

use serde_json::{json, Value};

use regiment_log::validation::{validate_log_format, MAX_CONTEXT_DEPTH, SYSTEM_REQUIRED_FIELDS};
use regiment_log::AppError;

fn record() -> Value {
    json!({
        "timestamp": "2025-01-27T22:00:00+00:00",
        "level": "WARNING",
        "module": "meal_delivery",
        "message": "retrying delivery",
        "trace_id": "5f1c2d9e-0000-4000-8000-000000000000",
    })
}

fn nested(levels: usize) -> Value {
    let mut value = json!(1);
    for _ in 0..levels {
        value = json!({ "k": value });
    }
    value
}

#[test]
fn required_fields_are_enforced() {
    for field in SYSTEM_REQUIRED_FIELDS {
        let mut rec = record();
        rec.as_object_mut().expect("object").remove(field);
        let err = validate_log_format(&rec).expect_err(field);
        assert!(err.to_string().contains(field), "{err}");
    }
}

#[test]
fn all_five_statuses_are_accepted() {
    for status in ["completed", "failed", "missed", "pending", "skipped"] {
        let mut rec = record();
        rec["status"] = json!(status);
        assert!(validate_log_format(&rec).is_ok(), "{status}");
    }
}

#[test]
fn unknown_level_is_rejected() {
    let mut rec = record();
    rec["level"] = json!("NOTICE");
    let err = validate_log_format(&rec).expect_err("bad level");
    assert!(err.to_string().contains("invalid log level"));
}

#[test]
fn user_id_must_be_snowflake_when_present() {
    let mut rec = record();
    rec["user_id"] = json!("123456789012345678");
    assert!(validate_log_format(&rec).is_ok());

    rec["user_id"] = json!("");
    assert!(validate_log_format(&rec)
        .expect_err("empty")
        .to_string()
        .contains("cannot be empty"));

    rec["user_id"] = json!("42");
    assert!(matches!(
        validate_log_format(&rec).expect_err("short"),
        AppError::Format(_)
    ));
}

#[test]
fn context_depth_limit_is_inclusive() {
    let mut rec = record();
    rec["context"] = nested(MAX_CONTEXT_DEPTH);
    assert!(validate_log_format(&rec).is_ok());

    rec["context"] = nested(MAX_CONTEXT_DEPTH + 1);
    let err = validate_log_format(&rec).expect_err("too deep");
    assert!(err.to_string().contains("max 5 levels"), "{err}");
}

#[test]
fn context_must_be_mapping() {
    let mut rec = record();
    rec["context"] = json!(["a", "b"]);
    assert!(validate_log_format(&rec).is_err());
}

#[test]
fn trace_id_must_be_string() {
    let mut rec = record();
    rec["trace_id"] = json!(7);
    let err = validate_log_format(&rec).expect_err("numeric trace id");
    assert!(err.to_string().contains("trace_id must be string"));
}

#[test]
fn record_level_must_be_canonical_upper_case() {
    for level in ["info", "Warning", "error "] {
        let mut rec = record();
        rec["level"] = json!(level);
        let err = validate_log_format(&rec).expect_err(level);
        assert!(err.to_string().contains("invalid log level"), "{err}");
    }
    for level in ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"] {
        let mut rec = record();
        rec["level"] = json!(level);
        assert!(validate_log_format(&rec).is_ok(), "{level}");
    }
}
