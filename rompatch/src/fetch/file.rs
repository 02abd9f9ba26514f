//! Patch fetching from a local mirror.

use std::future::Future;

use bytes::Bytes;
use reqwest::Url;
use tracing::debug;

use super::{FetchError, PatchFetcher};

/// Reads `file://` URLs from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl FileFetcher {
    pub fn new() -> Self {
        Self
    }
}

#[allow(clippy::manual_async_fn)]
impl PatchFetcher for FileFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Bytes, FetchError>> + Send {
        let url = url.to_string();
        async move {
            let parsed = Url::parse(&url).map_err(|e| FetchError::InvalidUrl {
                url: url.clone(),
                reason: e.to_string(),
            })?;
            if parsed.scheme() != "file" {
                return Err(FetchError::UnsupportedScheme { url });
            }

            let path = parsed.to_file_path().map_err(|_| FetchError::InvalidUrl {
                url: url.clone(),
                reason: "not a local file path".to_string(),
            })?;

            debug!(path = %path.display(), "Reading patch from disk");
            tokio::fs::read(&path)
                .await
                .map(Bytes::from)
                .map_err(|source| FetchError::Read { path, source })
        }
    }
}
