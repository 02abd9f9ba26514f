//! Error types for patch fetching.

use std::io;
use std::path::PathBuf;

/// Errors raised while fetching patch bytes.
#[derive(Debug)]
pub enum FetchError {
    /// The descriptor URL could not be parsed.
    InvalidUrl { url: String, reason: String },

    /// No fetcher handles the URL's scheme.
    UnsupportedScheme { url: String },

    /// The HTTP request could not be completed.
    Http { url: String, reason: String },

    /// The server answered with a non-success status.
    Status { url: String, status: u16 },

    /// A local patch file could not be read.
    Read { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl { url, reason } => write!(f, "invalid URL '{}': {}", url, reason),
            Self::UnsupportedScheme { url } => write!(f, "unsupported URL scheme: {}", url),
            Self::Http { url, reason } => write!(f, "request to {} failed: {}", url, reason),
            Self::Status { url, status } => write!(f, "HTTP {} from {}", status, url),
            Self::Read { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = FetchError::Status {
            url: "https://example.com/a.ips".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "HTTP 404 from https://example.com/a.ips");
    }

    #[test]
    fn test_read_error_has_source() {
        let err = FetchError::Read {
            path: PathBuf::from("/tmp/a.ips"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/a.ips"));
        assert!(err.source().is_some());
    }
}
