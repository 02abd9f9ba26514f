//! CLI error type.

use std::io;
use std::path::PathBuf;

use rompatch::catalog::CatalogError;
use rompatch::config::ConfigFileError;
use rompatch::fetch::FetchError;
use rompatch::ips::IpsError;
use rompatch::logging::LoggingError;
use rompatch::orchestrator::OrchestratorError;
use rompatch::PatcherError;

/// Errors reported to the user by the `rompatch` binary.
#[derive(Debug)]
pub enum CliError {
    /// Invalid configuration or command line input.
    Config(String),

    /// The configuration file could not be read or written.
    ConfigFile(ConfigFileError),

    /// The tracing subscriber could not be installed.
    Logging(LoggingError),

    /// The async runtime could not be started.
    Runtime(io::Error),

    /// A catalog, fetch or patch step failed.
    Patcher(PatcherError),

    /// A local patch file could not be read.
    ReadFailed { path: PathBuf, source: io::Error },

    /// A local patch file is not valid IPS.
    InvalidPatch { path: PathBuf, source: IpsError },

    /// The user interrupted the run.
    Cancelled,
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cancelled => 0,
            Self::Config(_) => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "{}", msg),
            Self::ConfigFile(e) => write!(f, "configuration error: {}", e),
            Self::Logging(e) => write!(f, "logging error: {}", e),
            Self::Runtime(e) => write!(f, "failed to start runtime: {}", e),
            Self::Patcher(e) => write!(f, "{}", e),
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::InvalidPatch { path, source } => {
                write!(f, "{} is not a valid IPS patch: {}", path.display(), source)
            }
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigFile(e) => Some(e),
            Self::Logging(e) => Some(e),
            Self::Runtime(e) => Some(e),
            Self::Patcher(e) => Some(e),
            Self::ReadFailed { source, .. } => Some(source),
            Self::InvalidPatch { source, .. } => Some(source),
            Self::Config(_) | Self::Cancelled => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        Self::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        Self::Logging(e)
    }
}

impl From<PatcherError> for CliError {
    fn from(e: PatcherError) -> Self {
        if e.is_cancelled() {
            Self::Cancelled
        } else {
            Self::Patcher(e)
        }
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        Self::Patcher(e.into())
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        Self::Patcher(e.into())
    }
}

impl From<OrchestratorError> for CliError {
    fn from(e: OrchestratorError) -> Self {
        Self::Patcher(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_patcher_error_maps_to_cancelled() {
        let err: CliError = PatcherError::Cancelled.into();
        assert!(matches!(err, CliError::Cancelled));
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_orchestrator_error_is_wrapped() {
        let err: CliError = OrchestratorError::UnknownVersion("9.9".to_string()).into();
        assert!(matches!(err, CliError::Patcher(_)));
        assert_eq!(err.to_string(), "version '9.9' not found in catalog");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_config_error_exit_code() {
        assert_eq!(CliError::Config("bad".to_string()).exit_code(), 2);
    }
}
