//! Tracing subscriber setup.
//!
//! Logs always go to stderr. When a log file is configured, a second,
//! non-blocking layer writes plain-text lines there as well. `RUST_LOG`
//! overrides the configured level.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },

    #[error("failed to prepare log file {path}: {source}")]
    File { path: PathBuf, source: io::Error },

    #[error("failed to open log file {path}: {reason}")]
    Appender { path: PathBuf, reason: String },

    #[error("a global subscriber is already installed")]
    AlreadyInitialized,
}

/// Keeps the file writer alive. Dropping it flushes pending lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Build the level filter, preferring `RUST_LOG` when it is set.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| LoggingError::Filter {
        filter: level.to_string(),
        reason: e.to_string(),
    })
}

fn timer() -> OffsetTime<Rfc3339> {
    OffsetTime::local_rfc_3339().unwrap_or_else(|_| OffsetTime::new(UtcOffset::UTC, Rfc3339))
}

fn file_appender(path: &Path) -> Result<RollingFileAppender, LoggingError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| LoggingError::Appender {
            path: path.to_path_buf(),
            reason: "log file path has no file name".to_string(),
        })?;

    fs::create_dir_all(&dir).map_err(|source| LoggingError::File {
        path: dir.clone(),
        source,
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(&dir)
        .map_err(|e| LoggingError::Appender {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for as long as logs should reach the file.
pub fn init_logging(level: &str, file: Option<&Path>) -> Result<LogGuard, LoggingError> {
    let filter = build_filter(level)?;

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(timer())
        .with_target(false);

    let (file_layer, guard) = match file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(timer());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    Ok(LogGuard { _file: guard })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_filter_accepts_levels() {
        for level in ["trace", "debug", "info", "warn", "error", "rompatch=debug"] {
            assert!(build_filter(level).is_ok(), "level {}", level);
        }
    }

    #[test]
    fn test_file_appender_creates_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs").join("rompatch.log");

        file_appender(&path).unwrap();
        assert!(temp.path().join("logs").is_dir());
    }

    #[test]
    fn test_file_appender_needs_file_name() {
        let result = file_appender(Path::new("/"));
        assert!(matches!(result, Err(LoggingError::Appender { .. })));
    }
}
