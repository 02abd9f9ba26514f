//! Sources of flat catalog path listings.
//!
//! A listing returns every path of the catalog, directories included, with
//! each directory named before anything inside it. Two sources ship with
//! the crate:
//!
//! - [`GitHubTreeListing`] reads the recursive git tree of a branch through
//!   the GitHub REST API.
//! - [`DirectoryListing`] walks a local mirror of the same layout.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::error::CatalogError;

/// Default GitHub REST API root.
pub const GITHUB_API_ROOT: &str = "https://api.github.com";

/// Default root for raw file downloads from GitHub.
pub const GITHUB_RAW_ROOT: &str = "https://raw.githubusercontent.com";

const USER_AGENT: &str = concat!("rompatch/", env!("CARGO_PKG_VERSION"));

/// Timeout for the tree request when none is configured.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Anything that can list catalog paths.
pub trait TreeListing: Send + Sync {
    /// Where the listing comes from, for logs and errors.
    fn location(&self) -> String;

    /// List every path, parents before children.
    fn list_paths(&self) -> impl Future<Output = Result<Vec<String>, CatalogError>> + Send;
}

/// A GitHub branch given as `owner/repo/branch`.
///
/// The branch part may itself contain slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRepository {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl GitHubRepository {
    /// Raw download root for this branch, without a trailing slash.
    pub fn raw_root(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            GITHUB_RAW_ROOT, self.owner, self.repo, self.branch
        )
    }
}

impl FromStr for GitHubRepository {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), Some(branch))
                if !owner.is_empty() && !repo.is_empty() && !branch.is_empty() =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    branch: branch.to_string(),
                })
            }
            _ => Err(CatalogError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for GitHubRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.owner, self.repo, self.branch)
    }
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    path: String,
}

/// Listing backed by the GitHub git trees API.
#[derive(Debug, Clone)]
pub struct GitHubTreeListing {
    client: Client,
    repository: GitHubRepository,
    api_root: String,
}

impl GitHubTreeListing {
    /// Create a listing for `repository` with the default timeout.
    pub fn new(repository: GitHubRepository) -> Result<Self, CatalogError> {
        Self::with_timeout(repository, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a listing with a custom request timeout.
    pub fn with_timeout(
        repository: GitHubRepository,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Listing {
                location: repository.to_string(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            repository,
            api_root: GITHUB_API_ROOT.to_string(),
        })
    }

    /// Point the listing at another API root (GitHub Enterprise, tests).
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into().trim_end_matches('/').to_string();
        self
    }

    pub fn repository(&self) -> &GitHubRepository {
        &self.repository
    }

    /// URL of the recursive tree request.
    pub fn tree_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/heads/{}?recursive=1",
            self.api_root, self.repository.owner, self.repository.repo, self.repository.branch
        )
    }

    fn failure(&self, reason: impl Into<String>) -> CatalogError {
        CatalogError::Listing {
            location: self.location(),
            reason: reason.into(),
        }
    }
}

#[allow(clippy::manual_async_fn)]
impl TreeListing for GitHubTreeListing {
    fn location(&self) -> String {
        format!("github:{}", self.repository)
    }

    fn list_paths(&self) -> impl Future<Output = Result<Vec<String>, CatalogError>> + Send {
        async move {
            let url = self.tree_url();
            debug!(url = %url, "Requesting catalog tree");

            let response = self
                .client
                .get(&url)
                .header("Accept", "application/vnd.github+json")
                .send()
                .await
                .map_err(|e| self.failure(format!("request failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(self.failure(format!("HTTP {} from {}", response.status(), url)));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| self.failure(format!("failed to read response: {}", e)))?;

            parse_tree_response(&body).map_err(|reason| self.failure(reason))
        }
    }
}

/// Extract the paths of a git trees API response body.
fn parse_tree_response(body: &[u8]) -> Result<Vec<String>, String> {
    let response: TreeResponse =
        serde_json::from_slice(body).map_err(|e| format!("invalid tree response: {}", e))?;

    if response.truncated {
        warn!(
            entries = response.tree.len(),
            "Catalog tree listing was truncated by the server"
        );
    }

    Ok(response.tree.into_iter().map(|item| item.path).collect())
}

/// Listing backed by a local directory laid out like the remote catalog.
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    root: PathBuf,
}

impl DirectoryListing {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[allow(clippy::manual_async_fn)]
impl TreeListing for DirectoryListing {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn list_paths(&self) -> impl Future<Output = Result<Vec<String>, CatalogError>> + Send {
        async move {
            let root = self.root.clone();
            let location = self.location();

            tokio::task::spawn_blocking(move || {
                let mut paths = Vec::new();
                walk(&root, "", &mut paths).map(|_| paths)
            })
            .await
            .map_err(|e| CatalogError::Listing {
                location: location.clone(),
                reason: format!("listing task failed: {}", e),
            })?
            .map_err(|e| CatalogError::Listing {
                location,
                reason: e.to_string(),
            })
        }
    }
}

/// Depth-first walk emitting each directory before its contents.
///
/// Hidden entries are skipped. Siblings are visited in name order.
fn walk(dir: &Path, prefix: &str, out: &mut Vec<String>) -> std::io::Result<()> {
    let mut entries = std::fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let path = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };
        out.push(path.clone());

        if entry.file_type()?.is_dir() {
            walk(&entry.path(), &path, out)?;
        }
    }

    Ok(())
}
