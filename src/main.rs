#![forbid(unsafe_code)]

//! `regiment-log`: LST Master event logging command line.
//!
//! Emits engine events, validates recorded JSONL streams, and computes
//! client-local dates. Records go to stdout and `<log_dir>/<sink>.log`;
//! diagnostics go to stderr.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use regiment_log::client_date::calculate_client_date;
use regiment_log::models::{EngineStatus, SourceEngine};
use regiment_log::timestamp;
use regiment_log::validation::validate_engine_event_format;
use regiment_log::{AppError, EngineEventRequest, EventLogger, LoggingConfig, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "regiment-log", about = "LST Master event logging", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Diagnostic output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the configured log directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Emit the reference event for every engine.
    Demo {
        /// Client snowflake.
        #[arg(long, default_value = "123456789012345678")]
        user_id: String,
        /// Client offset.
        #[arg(long, default_value = "UTC+2")]
        tz: String,
    },
    /// Emit one engine event.
    Emit {
        /// Client snowflake.
        #[arg(long)]
        user_id: String,
        /// Producing engine.
        #[arg(long, value_enum)]
        engine: SourceEngine,
        /// Event outcome.
        #[arg(long, value_enum)]
        status: EngineStatus,
        /// Engine payload as a JSON object.
        #[arg(long)]
        data: String,
        /// ISO 8601 timestamp with offset; defaults to now.
        #[arg(long)]
        timestamp: Option<String>,
        /// Client offset, e.g. `UTC-5`.
        #[arg(long)]
        tz: Option<String>,
    },
    /// Validate a JSONL stream of LST Master records (`-` for stdin).
    Validate {
        /// File to read.
        input: PathBuf,
    },
    /// Print the client-local date for a timestamp.
    ClientDate {
        /// ISO 8601 timestamp with offset.
        timestamp: String,
        /// Client offset, e.g. `UTC+2`.
        #[arg(long)]
        tz: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => LoggingConfig::load_from_path(path)?,
        None => LoggingConfig::default(),
    }
    .with_env_overrides();
    if let Some(dir) = args.log_dir {
        config.log_dir = dir;
    }
    info!(log_dir = %config.log_dir.display(), "configuration loaded");

    let logger = Arc::new(EventLogger::new(config));

    match args.command {
        Command::Demo { user_id, tz } => demo(&logger, &user_id, &tz).await,
        Command::Emit {
            user_id,
            engine,
            status,
            data,
            timestamp,
            tz,
        } => {
            let data: Value = serde_json::from_str(&data)
                .map_err(|err| AppError::Schema(format!("--data is not JSON: {err}")))?;
            let mut request =
                EngineEventRequest::new(user_id, engine.as_str(), status.as_str(), data);
            if let Some(ts) = timestamp {
                request = request.with_timestamp(ts);
            }
            if let Some(tz) = tz {
                request = request.with_timezone_offset(tz);
            }
            logger.log_engine_event(request)?;
            Ok(())
        }
        Command::Validate { input } => validate_stream(&input),
        Command::ClientDate { timestamp: ts, tz } => {
            let instant = timestamp::to_utc(ts)?;
            println!("{}", calculate_client_date(instant, tz.as_deref())?);
            Ok(())
        }
    }
}

/// The four engines report concurrently, as they do on the scheduler.
async fn demo(logger: &Arc<EventLogger>, user_id: &str, tz: &str) -> Result<()> {
    let events = vec![
        ("meal", "completed", json!({"meal_id": "planC_meal3"})),
        (
            "training",
            "completed",
            json!({
                "exercise_id": "ex_dl_001",
                "exercise_name": "Deadlift",
                "weight_kg": 140.0,
                "reps": 6,
                "block_id": "steel_block_b",
                "day_index": 13,
            }),
        ),
        (
            "checkin",
            "completed",
            json!({
                "weight": 93.8,
                "mood": "😐",
                "soreness": "🟡",
                "stress": "⚡",
                "sleep": "🔥",
                "notes": "Feeling okay but a bit tight in the back.",
            }),
        ),
        (
            "cardio",
            "underperformed",
            json!({"assigned_minutes": 30, "actual_minutes": 24}),
        ),
        ("meal", "missed", json!({"meal_id": "planC_meal1"})),
    ];

    let mut handles = Vec::with_capacity(events.len());
    for (engine, status, data) in events {
        let logger = Arc::clone(logger);
        let request =
            EngineEventRequest::new(user_id, engine, status, data).with_timezone_offset(tz);
        handles.push(tokio::spawn(async move {
            logger.log_engine_event(request)
        }));
    }

    for handle in handles {
        handle
            .await
            .map_err(|err| AppError::Io(format!("demo engine task panicked: {err}")))??;
    }
    info!(sinks = ?logger.registry().names(), "demo complete");
    Ok(())
}

fn validate_stream(input: &Path) -> Result<()> {
    let reader: Box<dyn BufRead> = if input.as_os_str() == "-" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let file = std::fs::File::open(input)
            .map_err(|err| AppError::Io(format!("cannot open {}: {err}", input.display())))?;
        Box::new(BufReader::new(file))
    };

    let mut total = 0usize;
    let mut failed = 0usize;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        total += 1;
        let outcome = serde_json::from_str::<Value>(&line)
            .map_err(AppError::from)
            .and_then(|record| validate_engine_event_format(&record));
        match outcome {
            Ok(()) => println!("line {}: ok", index + 1),
            Err(err) => {
                failed += 1;
                println!("line {}: {err}", index + 1);
            }
        }
    }

    if failed == 0 {
        info!(total, "all records valid");
        Ok(())
    } else {
        error!(total, failed, "records failed validation");
        Err(AppError::Schema(format!(
            "{failed} of {total} records failed validation"
        )))
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
