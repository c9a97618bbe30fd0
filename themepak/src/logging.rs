//! Tracing subscriber setup.
//!
//! Console output goes to stderr so command output on stdout stays clean.
//! An optional log file receives the same events without ANSI colors
//! through a non-blocking writer; keep the returned [`LoggingGuard`] alive
//! until exit so buffered lines are flushed.
//!
//! The level comes from `THEMEPAK_LOG` when set (any `EnvFilter`
//! directive), otherwise from [`LogOptions::level`].

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable overriding the configured filter.
pub const LOG_ENV_VAR: &str = "THEMEPAK_LOG";

/// Errors installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("failed to open log file {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("a global subscriber is already installed")]
    AlreadyInitialized,
}

/// Where and how much to log.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Filter directive, usually a bare level such as `info`.
    pub level: String,
    /// Append events to this file as well.
    pub file: Option<PathBuf>,
    /// Emit events on stderr.
    pub console: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            console: true,
        }
    }
}

impl LogOptions {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }
}

/// Keeps the file writer's worker thread alive.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidFilter {
        filter: level.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber.
pub fn init_logging(options: &LogOptions) -> Result<LoggingGuard, LoggingError> {
    let filter = build_filter(&options.level)?;
    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ));

    let console_layer = options.console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(timer.clone())
            .with_target(false)
            .compact()
    });

    let (file_layer, guard) = match &options.file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| LoggingError::OpenFile {
                    path: path.clone(),
                    source: e,
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| LoggingError::OpenFile {
                    path: path.clone(),
                    source: e,
                })?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_timer(timer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    Ok(LoggingGuard { _file: guard })
}
