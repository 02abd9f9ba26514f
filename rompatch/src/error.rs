//! Top-level error type for patch runs.

use std::io;
use std::path::PathBuf;

use crate::buffer::BufferError;
use crate::catalog::CatalogError;
use crate::fetch::FetchError;
use crate::format::FormatError;
use crate::ips::IpsError;
use crate::orchestrator::OrchestratorError;

/// Result type for patch runs.
pub type PatcherResult<T> = Result<T, PatcherError>;

/// Errors that can end a catalog load or patch run.
#[derive(Debug)]
pub enum PatcherError {
    /// Catalog listing or reconstruction failed.
    Catalog(CatalogError),

    /// Patch bytes could not be fetched.
    Fetch(FetchError),

    /// A patch could not be decoded or applied.
    Format(FormatError),

    /// The options could not be resolved to patches.
    Orchestrator(OrchestratorError),

    /// A buffer access went out of bounds.
    Buffer(BufferError),

    /// Failed to read an input file.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write the output file.
    WriteFailed { path: PathBuf, source: io::Error },

    /// The cancellation token fired. Callers drop this silently.
    Cancelled,
}

impl PatcherError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for PatcherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Catalog(e) => write!(f, "catalog error: {}", e),
            Self::Fetch(e) => write!(f, "fetch error: {}", e),
            Self::Format(e) => write!(f, "patch error: {}", e),
            Self::Orchestrator(e) => write!(f, "{}", e),
            Self::Buffer(e) => write!(f, "buffer error: {}", e),
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Self::Cancelled => write!(f, "operation cancelled"),
        }
    }
}

impl std::error::Error for PatcherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog(e) => Some(e),
            Self::Fetch(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::Orchestrator(e) => Some(e),
            Self::Buffer(e) => Some(e),
            Self::ReadFailed { source, .. } => Some(source),
            Self::WriteFailed { source, .. } => Some(source),
            Self::Cancelled => None,
        }
    }
}

impl From<CatalogError> for PatcherError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

impl From<FetchError> for PatcherError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

impl From<FormatError> for PatcherError {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<IpsError> for PatcherError {
    fn from(e: IpsError) -> Self {
        Self::Format(FormatError::from(e))
    }
}

impl From<OrchestratorError> for PatcherError {
    fn from(e: OrchestratorError) -> Self {
        Self::Orchestrator(e)
    }
}

impl From<BufferError> for PatcherError {
    fn from(e: BufferError) -> Self {
        Self::Buffer(e)
    }
}
