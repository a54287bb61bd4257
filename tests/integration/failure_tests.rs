//! Engine failure reports and the last-resort fallback.

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};

use regiment_log::logger::ENGINE_FAILURES_SINK;
use regiment_log::sink::{ConsoleTarget, MemoryConsole};
use regiment_log::{EventLogger, LoggingConfig};

use super::test_helpers::harness;

#[derive(Debug)]
struct DeliveryError {
    source: std::io::Error,
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("meal delivery failed")
    }
}

impl std::error::Error for DeliveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

fn delivery_error() -> DeliveryError {
    DeliveryError {
        source: std::io::Error::new(std::io::ErrorKind::TimedOut, "courier api timed out"),
    }
}

#[test]
fn failure_is_reported_with_exception_chain() {
    let h = harness();
    h.logger.log_engine_failure(
        "meal",
        &delivery_error(),
        json!({"meal_id": "planC_meal3", "courier": "ops@couriers.example"}),
    );

    let records = h.file_records(ENGINE_FAILURES_SINK);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["level"], "ERROR");
    assert_eq!(record["module"], ENGINE_FAILURES_SINK);
    assert_eq!(record["message"], "Engine failure in meal: meal delivery failed");
    assert_eq!(record["engine_name"], "meal");
    assert_eq!(record["status"], "failed");
    assert_eq!(record["context"]["error_type"], "DeliveryError");
    assert_eq!(record["context"]["error_message"], "meal delivery failed");
    assert_eq!(record["context"]["meal_id"], "planC_meal3");
    assert_eq!(record["context"]["courier"], "[EMAIL_REDACTED]");
    assert_eq!(record["exception"]["type"], "DeliveryError");
    assert_eq!(record["exception"]["chain"], json!(["courier api timed out"]));
    assert!(h.fallback.lines().is_empty());
}

#[test]
fn trait_object_errors_are_accepted() {
    let h = harness();
    let err: Box<dyn std::error::Error + Send + Sync> = "plain failure".into();
    h.logger.log_engine_failure("cardio", err.as_ref(), json!({}));
    assert_eq!(h.file_records(ENGINE_FAILURES_SINK).len(), 1);
}

#[test]
fn bad_context_falls_back_instead_of_failing() {
    let h = harness();
    h.logger
        .log_engine_failure("training", &delivery_error(), json!("not a mapping"));

    assert!(h.file_records(ENGINE_FAILURES_SINK).is_empty());
    let lines = h.fallback.lines();
    assert_eq!(lines.len(), 1);
    let fallback: Value = serde_json::from_str(&lines[0]).expect("fallback is JSON");
    assert_eq!(fallback["level"], "CRITICAL");
    assert_eq!(fallback["module"], "logger_fallback");
    assert_eq!(fallback["original_engine"], "training");
    assert_eq!(fallback["original_error"], "meal delivery failed");
    assert!(fallback["message"]
        .as_str()
        .expect("message string")
        .starts_with("Logger failure while logging engine error: "));
}

#[test]
fn unwritable_log_dir_falls_back_instead_of_failing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "occupied").expect("write blocker");

    let fallback = MemoryConsole::new();
    let config = LoggingConfig {
        log_dir: blocker,
        console: ConsoleTarget::Memory(MemoryConsole::new()),
        ..LoggingConfig::default()
    };
    let logger =
        Arc::new(EventLogger::new(config).with_fallback(ConsoleTarget::Memory(fallback.clone())));

    logger.log_engine_failure("checkin", &delivery_error(), json!({"weight": 93.8}));

    let lines = fallback.lines();
    assert_eq!(lines.len(), 1);
    let line: Value = serde_json::from_str(&lines[0]).expect("fallback is JSON");
    assert_eq!(line["original_engine"], "checkin");
    assert!(line["message"]
        .as_str()
        .expect("message string")
        .contains("io: cannot create log directory"));
}
