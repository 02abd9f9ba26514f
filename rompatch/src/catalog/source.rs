//! Where a catalog lives: a GitHub branch or a local mirror.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use reqwest::Url;

use super::error::CatalogError;
use super::listing::GitHubRepository;

/// Catalog used when none is configured.
pub const DEFAULT_CATALOG_SOURCE: &str = "elizabethlfransen/emerald-final-patches/main";

/// A configured catalog location.
///
/// Parsed from `owner/repo/branch`, a `file://` URL, or a filesystem path
/// starting with `/`, `./`, `../` or `~/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    GitHub(GitHubRepository),
    Directory(PathBuf),
}

impl CatalogSource {
    /// Root URL patch paths are appended to.
    pub fn raw_root(&self) -> Result<String, CatalogError> {
        match self {
            Self::GitHub(repo) => Ok(repo.raw_root()),
            Self::Directory(dir) => directory_url(dir),
        }
    }
}

fn directory_url(dir: &Path) -> Result<String, CatalogError> {
    let invalid = || CatalogError::InvalidPath {
        path: dir.display().to_string(),
    };

    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir().map_err(|_| invalid())?.join(dir)
    };

    Url::from_directory_path(&absolute)
        .map(String::from)
        .map_err(|_| invalid())
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

impl FromStr for CatalogSource {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.starts_with("file://") {
            let url = Url::parse(s).map_err(|_| CatalogError::InvalidPath {
                path: s.to_string(),
            })?;
            let path = url.to_file_path().map_err(|_| CatalogError::InvalidPath {
                path: s.to_string(),
            })?;
            return Ok(Self::Directory(path));
        }

        let looks_like_path = s.starts_with('/')
            || s.starts_with("./")
            || s.starts_with("../")
            || s.starts_with("~/")
            || Path::new(s).is_absolute();
        if looks_like_path {
            return Ok(Self::Directory(expand_home(s)));
        }

        s.parse().map(Self::GitHub)
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub(repo) => write!(f, "{}", repo),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

impl Default for CatalogSource {
    fn default() -> Self {
        Self::GitHub(GitHubRepository {
            owner: "elizabethlfransen".to_string(),
            repo: "emerald-final-patches".to_string(),
            branch: "main".to_string(),
        })
    }
}
