//! Patch byte retrieval.
//!
//! The orchestrator only needs raw patch bytes for a URL. [`PatchFetcher`]
//! is that seam; [`HttpFetcher`] serves remote catalogs, [`FileFetcher`]
//! serves `file://` mirrors, and [`SourceFetcher`] picks between them by
//! URL scheme.

mod error;
mod file;
mod http;

pub use error::FetchError;
pub use file::FileFetcher;
pub use http::{HttpFetcher, DEFAULT_TIMEOUT_SECS};

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

/// Fetches raw patch bytes by URL.
pub trait PatchFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Bytes, FetchError>> + Send;
}

/// Dispatches `http`/`https` URLs to HTTP and `file` URLs to disk.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl SourceFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self::from_http(HttpFetcher::new()?))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self::from_http(HttpFetcher::with_timeout(timeout)?))
    }

    pub fn from_http(http: HttpFetcher) -> Self {
        Self {
            http,
            file: FileFetcher::new(),
        }
    }
}

impl PatchFetcher for SourceFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let scheme = url.split_once(':').map(|(scheme, _)| scheme.to_ascii_lowercase());
        match scheme.as_deref() {
            Some("http") | Some("https") => self.http.fetch(url).await,
            Some("file") => self.file.fetch(url).await,
            _ => Err(FetchError::UnsupportedScheme {
                url: url.to_string(),
            }),
        }
    }
}
