#![forbid(unsafe_code)]

//! LST Master structured event logging for TheRegiment coaching engines.
//!
//! Engines report completions, misses and failures through
//! [`logger::EventLogger`]. Each record is timestamp-normalized, dated in
//! the client's local calendar, schema-validated, PII-sanitized where it
//! carries free text, and appended as one JSON line to a named sink.

pub mod client_date;
pub mod config;
pub mod errors;
pub mod logger;
pub mod models;
mod patterns;
pub mod sanitize;
pub mod sink;
pub mod timestamp;
pub mod validation;

pub use config::LoggingConfig;
pub use errors::{AppError, Result};
pub use logger::{EngineEventRequest, EventLogger, SystemEvent};
