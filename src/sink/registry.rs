//! Process-owned registry of named sinks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::{ConsoleTarget, NamedSink};
use crate::models::LogLevel;
use crate::{AppError, Result};

/// Registry mapping sink names to open sinks.
///
/// Creation happens while the registry lock is held, so concurrent first
/// use of one name from many tasks opens exactly one sink.
#[derive(Debug)]
pub struct SinkRegistry {
    log_dir: PathBuf,
    default_level: LogLevel,
    console: ConsoleTarget,
    sinks: Mutex<HashMap<String, Arc<NamedSink>>>,
}

impl SinkRegistry {
    /// Construct an empty registry. No files are touched until a sink is
    /// requested.
    #[must_use]
    pub fn new(log_dir: PathBuf, default_level: LogLevel, console: ConsoleTarget) -> Self {
        Self {
            log_dir,
            default_level,
            console,
            sinks: Mutex::new(HashMap::new()),
        }
    }

    /// Directory holding every sink's file.
    #[must_use]
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Return the sink for `name`, opening it at the default level on first
    /// use.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the sink cannot be opened, or
    /// `AppError::Schema` for an invalid name.
    pub fn get_or_create(&self, name: &str) -> Result<Arc<NamedSink>> {
        let mut sinks = self.lock()?;
        if let Some(sink) = sinks.get(name) {
            return Ok(Arc::clone(sink));
        }
        let sink = Arc::new(self.open(name, self.default_level)?);
        sinks.insert(name.to_owned(), Arc::clone(&sink));
        debug!(sink = name, path = %sink.path().display(), "sink opened");
        Ok(sink)
    }

    /// Open a fresh sink for `name` at `level`, replacing any existing one.
    ///
    /// Holders of the previous `Arc` keep writing to the old destinations
    /// until they drop it; new lookups see only the replacement.
    ///
    /// # Errors
    ///
    /// Same as [`SinkRegistry::get_or_create`].
    pub fn initialize(&self, name: &str, level: LogLevel) -> Result<Arc<NamedSink>> {
        let mut sinks = self.lock()?;
        let sink = Arc::new(self.open(name, level)?);
        let replaced = sinks
            .insert(name.to_owned(), Arc::clone(&sink))
            .is_some();
        debug!(sink = name, %level, replaced, "sink initialized");
        Ok(sink)
    }

    /// Whether a sink for `name` has been opened.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sinks
            .lock()
            .map(|sinks| sinks.contains_key(name))
            .unwrap_or(false)
    }

    /// Names of every open sink, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .sinks
            .lock()
            .map(|sinks| sinks.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    fn open(&self, name: &str, level: LogLevel) -> Result<NamedSink> {
        NamedSink::open(&self.log_dir, name, level, self.console.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Arc<NamedSink>>>> {
        self.sinks
            .lock()
            .map_err(|_| AppError::Io("sink registry mutex poisoned".into()))
    }
}
