//! Console + JSONL file sink.

use std::{
    fs::{self, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::warn;

use super::{ConsoleTarget, LogSink};
use crate::models::LogLevel;
use crate::{AppError, Result};

/// A named sink writing each line to its console and its log file.
///
/// Writes are serialized by an internal mutex, so a line is never
/// interleaved with another one on either destination.
pub struct NamedSink {
    name: String,
    min_level: LogLevel,
    path: PathBuf,
    console: ConsoleTarget,
    file: Mutex<BufWriter<fs::File>>,
}

impl std::fmt::Debug for NamedSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedSink")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("path", &self.path)
            .field("console", &self.console)
            .finish_non_exhaustive()
    }
}

impl NamedSink {
    /// Open (creating if needed) `<log_dir>/<name>.log` in append mode.
    ///
    /// Creates `log_dir` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Schema` for a name that is not a plain file stem,
    /// or `AppError::Io` if the directory or file cannot be opened.
    pub fn open(
        log_dir: &Path,
        name: &str,
        min_level: LogLevel,
        console: ConsoleTarget,
    ) -> Result<Self> {
        validate_name(name)?;
        fs::create_dir_all(log_dir).map_err(|e| {
            AppError::Io(format!(
                "cannot create log directory {}: {e}",
                log_dir.display()
            ))
        })?;
        let path = log_dir.join(format!("{name}.log"));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| AppError::Io(format!("cannot open log {}: {e}", path.display())))?;
        Ok(Self {
            name: name.to_owned(),
            min_level,
            path,
            console,
            file: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path of the file destination.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for NamedSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn write_line(&self, level: LogLevel, line: &str) -> Result<bool> {
        if level < self.min_level {
            return Ok(false);
        }

        let mut file = self
            .file
            .lock()
            .map_err(|_| AppError::Io(format!("sink {} mutex poisoned", self.name)))?;

        if let Err(e) = self.console.write_line(line) {
            warn!(sink = %self.name, "failed to write console line: {e}");
            return Err(AppError::Io(format!("console write failed: {e}")));
        }
        if let Err(e) = writeln!(file, "{line}") {
            warn!(sink = %self.name, "failed to write log line: {e}");
            return Err(AppError::Io(format!("log write failed: {e}")));
        }
        if let Err(e) = file.flush() {
            warn!(sink = %self.name, "failed to flush log: {e}");
            return Err(AppError::Io(format!("log flush failed: {e}")));
        }

        Ok(true)
    }
}

/// Sink names become file stems, so only `[A-Za-z0-9_.-]` is allowed and a
/// name may not start with a dot.
fn validate_name(name: &str) -> Result<()> {
    let plain = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if plain {
        Ok(())
    } else {
        Err(AppError::Schema(format!("invalid sink name: {name:?}")))
    }
}
