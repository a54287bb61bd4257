//! Sink registry lifecycle through the logger.

use serde_json::json;

use regiment_log::models::SourceEngine;
use regiment_log::{AppError, EngineEventRequest, SystemEvent};

use super::test_helpers::{harness, USER_ID};

#[test]
fn reinitializing_does_not_duplicate_lines() {
    let h = harness();
    h.logger.setup_logger("scheduler", "INFO").expect("first setup");
    h.logger.setup_logger("scheduler", "INFO").expect("second setup");
    h.logger
        .log_event(SystemEvent::new("INFO", "tick").with_module("scheduler"))
        .expect("valid event");

    assert_eq!(h.file_records("scheduler").len(), 1);
    assert_eq!(h.console.lines().len(), 1);
    assert_eq!(h.logger.registry().names(), ["scheduler"]);
}

#[test]
fn reinitializing_changes_the_threshold() {
    let h = harness();
    h.logger.setup_logger("scheduler", "ERROR").expect("setup");
    h.logger
        .log_event(SystemEvent::new("INFO", "dropped").with_module("scheduler"))
        .expect("below threshold");
    h.logger.setup_logger("scheduler", "debug").expect("lowered");
    h.logger
        .log_event(SystemEvent::new("DEBUG", "kept").with_module("scheduler"))
        .expect("valid event");

    let records = h.file_records("scheduler");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["message"], "kept");
}

#[test]
fn engine_logger_setup_names_the_engine_sink() {
    let h = harness();
    let sink = h
        .logger
        .setup_engine_logger(SourceEngine::Training, "WARNING")
        .expect("setup");
    assert!(sink.path().ends_with("engine_training.log"));
    assert!(h.logger.registry().contains("engine_training"));

    h.logger
        .log_engine_event(EngineEventRequest::new(
            USER_ID,
            "training",
            "completed",
            json!({
                "exercise_id": "ex_sq_001",
                "exercise_name": "Squat",
                "weight_kg": 120.5,
                "reps": 5,
                "block_id": "steel_block_b",
                "day_index": 2,
            }),
        ))
        .expect("valid event, below threshold");
    assert!(h.file_records("engine_training").is_empty());
}

#[test]
fn setup_rejects_unknown_level_and_bad_names() {
    let h = harness();
    assert!(matches!(
        h.logger.setup_logger("scheduler", "VERBOSE"),
        Err(AppError::Schema(_))
    ));
    assert!(matches!(
        h.logger.setup_logger("../escape", "INFO"),
        Err(AppError::Schema(_))
    ));
    assert!(h.logger.registry().names().is_empty());
}

#[test]
fn sinks_are_opened_lazily() {
    let h = harness();
    assert!(h.logger.registry().names().is_empty());
    assert!(std::fs::read_dir(h.dir.path())
        .expect("read dir")
        .next()
        .is_none());
    h.logger
        .log_event(SystemEvent::new("INFO", "first"))
        .expect("valid event");
    assert_eq!(h.logger.registry().names(), ["system"]);
}
