//! Event emitters.
//!
//! [`EventLogger`] owns the sink registry and exposes the four entry points
//! engines call: [`EventLogger::log_event`], [`EventLogger::log_engine_event`],
//! [`EventLogger::log_missed_event`] and [`EventLogger::log_engine_failure`].
//! Every record is validated before anything is written; an invalid record
//! is returned to the caller as an error and never reaches a sink.

use std::error::Error;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client_date::calculate_client_date;
use crate::config::LoggingConfig;
use crate::models::{
    EngineEvent, ExceptionInfo, LogLevel, SourceEngine, SystemLogRecord, SystemStatus,
};
use crate::sanitize::{sanitize_context, sanitize_string};
use crate::sink::{ConsoleTarget, LogSink, NamedSink, SinkRegistry};
use crate::timestamp::{self, TimestampInput};
use crate::validation::{parse_engine_event, validate_log_format};
use crate::{AppError, Result};

/// Sink receiving missed-event warnings.
pub const MISSED_EVENTS_SINK: &str = "missed_events";
/// Sink receiving engine failure reports.
pub const ENGINE_FAILURES_SINK: &str = "engine_failures";

/// An operational event for [`EventLogger::log_event`].
#[derive(Debug, Clone)]
pub struct SystemEvent {
    level: String,
    message: String,
    context: Option<Value>,
    user_id: Option<String>,
    module_name: Option<String>,
    trace_id: Option<String>,
}

impl SystemEvent {
    /// Construct an event. `level` is checked when the event is logged.
    #[must_use]
    pub fn new(level: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            message: message.into(),
            context: None,
            user_id: None,
            module_name: None,
            trace_id: None,
        }
    }

    /// Attach structured context; sanitized before emission.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach the client snowflake.
    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Route to a named sink instead of the default module.
    #[must_use]
    pub fn with_module(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = Some(module_name.into());
        self
    }

    /// Reuse a caller trace id instead of generating one.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

/// Raw engine event for [`EventLogger::log_engine_event`].
///
/// Fields are carried as the engines send them and checked only when the
/// canonical record is assembled.
#[derive(Debug, Clone)]
pub struct EngineEventRequest {
    user_id: String,
    source_engine: String,
    status: String,
    data: Value,
    timestamp: Option<TimestampInput>,
    timezone_offset: Option<String>,
}

impl EngineEventRequest {
    /// Construct a request stamped "now" in UTC.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        source_engine: impl Into<String>,
        status: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            source_engine: source_engine.into(),
            status: status.into(),
            data,
            timestamp: None,
            timezone_offset: None,
        }
    }

    /// When the event happened. Naive datetimes are taken as UTC.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<TimestampInput>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Client offset (`UTC±N`) used to derive the record date.
    #[must_use]
    pub fn with_timezone_offset(mut self, offset: impl Into<String>) -> Self {
        self.timezone_offset = Some(offset.into());
        self
    }
}

/// Fields shared by every System Log emission path.
struct SystemDraft {
    level: LogLevel,
    module: String,
    message: String,
    trace_id: Option<String>,
    context: Option<Value>,
    user_id: Option<String>,
    engine_name: Option<String>,
    event_type: Option<String>,
    status: Option<SystemStatus>,
    exception: Option<ExceptionInfo>,
}

impl SystemDraft {
    fn new(level: LogLevel, module: &str, message: String) -> Self {
        Self {
            level,
            module: module.to_owned(),
            message,
            trace_id: None,
            context: None,
            user_id: None,
            engine_name: None,
            event_type: None,
            status: None,
            exception: None,
        }
    }
}

/// Process-wide event logger. Share it behind an [`Arc`].
#[derive(Debug)]
pub struct EventLogger {
    registry: SinkRegistry,
    default_module: String,
    fallback: ConsoleTarget,
}

impl EventLogger {
    /// Build a logger from configuration. No files are opened yet.
    #[must_use]
    pub fn new(config: LoggingConfig) -> Self {
        Self {
            registry: SinkRegistry::new(config.log_dir, config.default_level, config.console),
            default_module: config.default_module,
            fallback: ConsoleTarget::Stderr,
        }
    }

    /// Send last-resort failure lines somewhere other than stderr.
    #[must_use]
    pub fn with_fallback(mut self, fallback: ConsoleTarget) -> Self {
        self.fallback = fallback;
        self
    }

    /// The sink registry.
    #[must_use]
    pub fn registry(&self) -> &SinkRegistry {
        &self.registry
    }

    /// (Re)initialize the sink for a module at `log_level`.
    ///
    /// Replaces any existing destinations for the name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Schema` for an unknown level or bad name, or
    /// `AppError::Io` if the log directory or file cannot be opened.
    pub fn setup_logger(&self, module_name: &str, log_level: &str) -> Result<Arc<NamedSink>> {
        let level: LogLevel = log_level.parse()?;
        self.registry.initialize(module_name, level)
    }

    /// (Re)initialize the LST sink for an engine.
    ///
    /// # Errors
    ///
    /// Same as [`EventLogger::setup_logger`].
    pub fn setup_engine_logger(
        &self,
        engine: SourceEngine,
        log_level: &str,
    ) -> Result<Arc<NamedSink>> {
        self.setup_logger(&engine.sink_name(), log_level)
    }

    /// Emit an operational System Log record.
    ///
    /// # Errors
    ///
    /// - `AppError::Schema` for an unknown level or an invalid record.
    /// - `AppError::Type` if the context is not a mapping.
    /// - `AppError::Io` if the sink cannot be written.
    pub fn log_event(&self, event: SystemEvent) -> Result<()> {
        let level: LogLevel = event.level.parse()?;
        let module = event
            .module_name
            .unwrap_or_else(|| self.default_module.clone());
        let mut draft = SystemDraft::new(level, &module, event.message);
        draft.trace_id = event.trace_id;
        draft.context = event.context;
        draft.user_id = event.user_id;
        self.emit_system(draft)
    }

    /// Validate and emit an LST Master engine event.
    ///
    /// The record date is derived from the timestamp and the client offset;
    /// it is never taken from the caller.
    ///
    /// # Errors
    ///
    /// - `AppError::Format` for a bad timestamp, offset, `user_id` or date.
    /// - `AppError::Range` for an offset beyond ±14 hours.
    /// - `AppError::Schema` for an unknown engine or status or a bad payload.
    /// - `AppError::Io` if the engine sink cannot be written.
    pub fn log_engine_event(&self, request: EngineEventRequest) -> Result<EngineEvent> {
        let instant = match request.timestamp {
            Some(input) => timestamp::to_utc(input)?,
            None => Utc::now(),
        };
        let date = calculate_client_date(instant, request.timezone_offset.as_deref())?;

        let raw = json!({
            "user_id": request.user_id,
            "date": date,
            "timestamp": timestamp::format_lst(instant),
            "source_engine": request.source_engine,
            "status": request.status,
            "data": request.data,
        });
        let event = parse_engine_event(&raw)?;

        let level = event.status().severity();
        let sink = self.registry.get_or_create(&event.source_engine().sink_name())?;
        let line = serde_json::to_string(&event)?;
        let written = sink.write_line(level, &line)?;

        debug!(
            trace_id = %Uuid::new_v4(),
            user_id = event.user_id(),
            source_engine = %event.source_engine(),
            status = %event.status(),
            %level,
            written,
            "engine event: {} - {}",
            event.source_engine(),
            event.status(),
        );
        Ok(event)
    }

    /// Emit a `missed` warning for an event that never happened.
    ///
    /// # Errors
    ///
    /// - `AppError::Format` if `timestamp` is a string without an offset or
    ///   `user_id` is not a snowflake.
    /// - `AppError::Io` if the sink cannot be written.
    pub fn log_missed_event(
        &self,
        user_id: &str,
        event_type: &str,
        timestamp: impl Into<TimestampInput>,
    ) -> Result<()> {
        let missed_at = timestamp::enforce_timestamp_format(timestamp)?;
        let mut draft = SystemDraft::new(
            LogLevel::Warning,
            MISSED_EVENTS_SINK,
            format!("Missed {event_type} event for user {user_id}"),
        );
        draft.context = Some(json!({
            "missed_at": missed_at,
            "event_type": event_type,
        }));
        draft.user_id = Some(user_id.to_owned());
        draft.event_type = Some(event_type.to_owned());
        draft.status = Some(SystemStatus::Missed);
        self.emit_system(draft)
    }

    /// Report an engine failure. Never fails.
    ///
    /// If the report itself cannot be emitted, one minimal JSON line naming
    /// the logger failure and the original error goes to the fallback
    /// console (stderr unless overridden).
    pub fn log_engine_failure<E: Error + ?Sized>(
        &self,
        engine_name: &str,
        error: &E,
        context: Value,
    ) {
        if let Err(log_error) = self.try_log_engine_failure(engine_name, error, context) {
            let line = fallback_line(engine_name, &error.to_string(), &log_error);
            // Nothing left to report to if the fallback fails too.
            let _ = self.fallback.write_line(&line);
        }
    }

    fn try_log_engine_failure<E: Error + ?Sized>(
        &self,
        engine_name: &str,
        error: &E,
        context: Value,
    ) -> Result<()> {
        let exception = ExceptionInfo::capture(error);
        let mut error_context = Map::new();
        error_context.insert("error_type".into(), Value::String(exception.kind.clone()));
        error_context.insert("error_message".into(), Value::String(error.to_string()));
        error_context.extend(sanitize_context(context)?);

        let mut draft = SystemDraft::new(
            LogLevel::Error,
            ENGINE_FAILURES_SINK,
            format!("Engine failure in {engine_name}: {error}"),
        );
        draft.context = Some(Value::Object(error_context));
        draft.engine_name = Some(engine_name.to_owned());
        draft.status = Some(SystemStatus::Failed);
        draft.exception = Some(exception);
        self.emit_system(draft)
    }

    fn emit_system(&self, draft: SystemDraft) -> Result<()> {
        let context = draft.context.map(sanitize_context).transpose()?;
        let record = SystemLogRecord {
            timestamp: timestamp::format_offset(Utc::now()),
            level: draft.level,
            module: draft.module,
            message: draft.message,
            trace_id: draft
                .trace_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            context,
            user_id: draft.user_id,
            engine_name: draft.engine_name,
            event_type: draft.event_type,
            status: draft.status,
            exception: draft.exception,
        };

        let value = serde_json::to_value(&record)?;
        validate_log_format(&value)?;
        let line = serde_json::to_string(&value)?;

        let sink = self.registry.get_or_create(&record.module)?;
        let written = sink.write_line(record.level, &line)?;
        if !written {
            debug!(module = %record.module, level = %record.level, "record below sink level");
        }
        Ok(())
    }
}

/// Minimal JSON line for when failure reporting itself fails.
fn fallback_line(engine_name: &str, original_error: &str, log_error: &AppError) -> String {
    warn!(engine = engine_name, %log_error, "engine failure report fell back to console");
    json!({
        "timestamp": timestamp::format_offset(Utc::now()),
        "level": LogLevel::Critical.as_str(),
        "module": "logger_fallback",
        "message": format!(
            "Logger failure while logging engine error: {}",
            sanitize_string(&log_error.to_string())
        ),
        "original_engine": engine_name,
        "original_error": sanitize_string(original_error),
    })
    .to_string()
}
