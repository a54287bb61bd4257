//! Unit tests for PII redaction.
//!
//! Redaction is best-effort; these tests pin the documented shapes only and
//! make no claim that all PII is caught.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use regiment_log::sanitize::{sanitize, sanitize_context, sanitize_serializable, sanitize_string};
use regiment_log::AppError;

#[test]
fn email_replaced_and_surroundings_kept() {
    let out = sanitize_string("Ping client jane.doe+fit@example.co.uk after lunch.");
    assert_eq!(out, "Ping client [EMAIL_REDACTED] after lunch.");
}

#[test]
fn multiple_matches_in_one_string() {
    let out = sanitize_string("a@b.io, c@d.org");
    assert_eq!(out, "[EMAIL_REDACTED], [EMAIL_REDACTED]");
}

#[test]
fn phone_number_variants() {
    for phone in ["555-123-4567", "555.123.4567", "5551234567"] {
        assert_eq!(
            sanitize_string(&format!("tel {phone}")),
            "tel [PHONE_REDACTED]",
            "{phone}"
        );
    }
}

#[test]
fn ip_address_is_redacted() {
    assert_eq!(
        sanitize_string("request from 10.0.0.12"),
        "request from [IP_ADDRESS_REDACTED]"
    );
}

#[test]
fn emoji_and_plain_notes_survive() {
    let note = "😐 🟡 ⚡ 🔥 tight back, slept 6h";
    assert_eq!(sanitize_string(note), note);
}

#[test]
fn nested_context_is_sanitized_recursively() {
    let out = sanitize_context(json!({
        "client": {"contact": {"email": "x@y.com", "weight": 93.8}},
        "tags": ["ok", "x@y.com", 5, null],
        "flag": false,
    }))
    .expect("mapping");
    assert_eq!(out["client"]["contact"]["email"], "[EMAIL_REDACTED]");
    assert_eq!(out["client"]["contact"]["weight"], 93.8);
    assert_eq!(out["tags"], json!(["ok", "[EMAIL_REDACTED]", 5, null]));
    assert_eq!(out["flag"], false);
}

#[test]
fn primitives_pass_through() {
    for value in [json!(1), json!(2.5), json!(true), json!(null)] {
        assert_eq!(sanitize(value.clone()), value);
    }
}

#[derive(Serialize)]
struct Delivery {
    meal_id: String,
    courier_email: String,
    attempts: u8,
}

#[test]
fn arbitrary_serializable_types_are_converted_then_sanitized() {
    let delivery = Delivery {
        meal_id: "planC_meal3".into(),
        courier_email: "driver@couriers.example".into(),
        attempts: 2,
    };
    let out = sanitize_serializable(&delivery).expect("serializable");
    assert_eq!(
        out,
        json!({
            "meal_id": "planC_meal3",
            "courier_email": "[EMAIL_REDACTED]",
            "attempts": 2,
        })
    );
}

#[test]
fn unrepresentable_values_fail_before_output() {
    let mut by_pair: BTreeMap<(u8, u8), &str> = BTreeMap::new();
    by_pair.insert((1, 1), "x");
    let err = sanitize_serializable(&by_pair).expect_err("tuple keys");
    assert!(matches!(err, AppError::Serialization(_)));
}
