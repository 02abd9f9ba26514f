//! Error types for catalog reconstruction and listing.

use thiserror::Error;

/// Errors raised while listing or rebuilding the patch catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A path arrived before its parent directory.
    #[error("could not find parent node for '{path}'")]
    UnknownParent { path: String },

    /// A path was empty or contained an empty segment.
    #[error("invalid catalog path '{path}'")]
    InvalidPath { path: String },

    /// The repository reference was not `owner/repo/branch`.
    #[error("expected repository as owner/repo/branch but received '{0}'")]
    InvalidRepository(String),

    /// The listing source could not be read.
    #[error("failed to list {location}: {reason}")]
    Listing { location: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::UnknownParent {
            path: "7.4/sub/b.ips".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "could not find parent node for '7.4/sub/b.ips'"
        );

        let err = CatalogError::InvalidRepository("owner/repo".to_string());
        assert!(err.to_string().contains("owner/repo/branch"));
    }
}
