//! Versioned patch catalog.
//!
//! The remote catalog is a directory tree whose top level holds one
//! directory per release (`7.4/`, `8.0/`, ...). A [`TreeListing`] returns
//! that tree as a flat list of paths; [`VersionGroup::from_paths`] rebuilds
//! it into nested [`PatchGroup`]s, one per version. Patch bytes are not
//! fetched here: leaf entries carry a [`PatchRef`] that the orchestrator
//! resolves later.
//!
//! # Example
//!
//! ```
//! use rompatch::catalog::VersionGroup;
//!
//! let groups = VersionGroup::from_paths([
//!     "7.4", "7.4/a.ips", "7.4/sub", "7.4/sub/b.ips", "8.0", "8.0/c.ips",
//! ]).unwrap();
//!
//! assert_eq!(groups.versions(), vec!["8.0", "7.4"]);
//! assert!(groups.get("7.4").unwrap().get(&["sub", "b.ips"]).is_some());
//! ```

mod error;
mod group;
mod listing;
mod source;
mod tree;

pub use error::CatalogError;
pub use group::{CatalogPath, PatchEntry, PatchGroup, PatchRef, VersionGroup};
pub use listing::{
    DirectoryListing, GitHubRepository, GitHubTreeListing, TreeListing, GITHUB_API_ROOT,
    GITHUB_RAW_ROOT,
};
pub use source::{CatalogSource, DEFAULT_CATALOG_SOURCE};
pub use tree::{build_tree, CatalogNode};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{PatcherError, PatcherResult};

/// A loaded catalog: every version group found in one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    location: String,
    groups: VersionGroup,
}

impl Catalog {
    /// List `listing` and rebuild its version groups.
    ///
    /// The token is checked once the listing returns, so a cancelled load
    /// yields [`PatcherError::Cancelled`] and builds nothing.
    pub async fn load<L: TreeListing>(
        listing: &L,
        cancel: &CancellationToken,
    ) -> PatcherResult<Self> {
        let location = listing.location();
        debug!(location = %location, "Loading patch catalog");

        let paths = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PatcherError::Cancelled),
            result = listing.list_paths() => result?,
        };

        if cancel.is_cancelled() {
            return Err(PatcherError::Cancelled);
        }

        let groups = VersionGroup::from_paths(&paths)?;
        info!(
            location = %location,
            paths = paths.len(),
            versions = groups.len(),
            "Patch catalog loaded"
        );

        Ok(Self { location, groups })
    }

    /// Build a catalog from an already known listing.
    pub fn from_paths<I, S>(location: impl Into<String>, paths: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            location: location.into(),
            groups: VersionGroup::from_paths(paths)?,
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn groups(&self) -> &VersionGroup {
        &self.groups
    }

    /// Version keys, newest first.
    pub fn versions(&self) -> Vec<&str> {
        self.groups.versions()
    }

    /// The version selected when the user picks none.
    pub fn default_version(&self) -> Option<&str> {
        self.groups.newest()
    }

    pub fn group(&self, version: &str) -> Option<&PatchGroup> {
        self.groups.get(version)
    }
}
