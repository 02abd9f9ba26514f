//! HTTP patch fetching with reqwest.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

use super::{FetchError, PatchFetcher};

/// Default timeout for patch downloads in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("rompatch/", env!("CARGO_PKG_VERSION"));

/// Fetches patches over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the default timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a fetcher with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Http {
                url: String::new(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[allow(clippy::manual_async_fn)]
impl PatchFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Bytes, FetchError>> + Send {
        let url = url.to_string();
        async move {
            debug!(url = %url, "Fetching patch");

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::Http {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;

            if !response.status().is_success() {
                return Err(FetchError::Status {
                    url,
                    status: response.status().as_u16(),
                });
            }

            let body = response.bytes().await.map_err(|e| FetchError::Http {
                url: url.clone(),
                reason: format!("failed to read response: {}", e),
            })?;

            debug!(url = %url, bytes = body.len(), "Patch fetched");
            Ok(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_fetcher() {
        assert!(HttpFetcher::new().is_ok());
        assert!(HttpFetcher::with_timeout(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(2)).unwrap();
        // Port 9 on localhost is the discard service and normally closed.
        let result = fetcher.fetch("http://127.0.0.1:9/7.4/a.ips").await;
        assert!(matches!(result, Err(FetchError::Http { .. })));
    }
}
