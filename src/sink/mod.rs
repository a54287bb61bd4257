//! Named append-only sinks.
//!
//! Every sink has exactly one console destination and one file destination
//! (`<log_dir>/<name>.log`). Sinks are owned by a [`SinkRegistry`], which
//! creates them lazily on first use and replaces them on explicit
//! re-initialization.

pub mod registry;
pub mod writer;

use std::io::Write;
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::models::LogLevel;

pub use registry::SinkRegistry;
pub use writer::NamedSink;

/// Writes formatted record lines to a destination pair.
///
/// Implementations must be [`Send`] and [`Sync`] so one sink can be shared
/// by every task logging under its name.
pub trait LogSink: Send + Sync {
    /// Sink name; also the log file stem.
    fn name(&self) -> &str;

    /// Least severe level this sink accepts.
    fn min_level(&self) -> LogLevel;

    /// Append one line at `level`.
    ///
    /// Returns `Ok(false)` when the line is below [`LogSink::min_level`] and
    /// was dropped.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if either destination fails.
    fn write_line(&self, level: LogLevel, line: &str) -> crate::Result<bool>;
}

/// Where a sink's console copy goes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleTarget {
    /// Process standard output.
    #[default]
    Stdout,
    /// Process standard error.
    Stderr,
    /// In-memory buffer, for embedding and tests.
    #[serde(skip)]
    Memory(MemoryConsole),
}

impl ConsoleTarget {
    /// Write `line` plus a newline and flush.
    ///
    /// # Errors
    ///
    /// Propagates the destination's I/O error.
    pub fn write_line(&self, line: &str) -> std::io::Result<()> {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                writeln!(out, "{line}")?;
                out.flush()
            }
            Self::Stderr => {
                let mut out = std::io::stderr().lock();
                writeln!(out, "{line}")?;
                out.flush()
            }
            Self::Memory(buffer) => buffer.push(line),
        }
    }
}

/// Shared in-memory console.
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryConsole {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, line: &str) -> std::io::Result<()> {
        self.lines
            .lock()
            .map_err(|_| std::io::Error::other("memory console mutex poisoned"))?
            .push(line.to_owned());
        Ok(())
    }

    /// Snapshot of every line written so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}
