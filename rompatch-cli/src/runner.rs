//! Shared setup for commands that talk to a catalog.
//!
//! `CliRunner` loads the configuration file, applies command line
//! overrides, installs logging, starts the tokio runtime and wires Ctrl+C
//! to a cancellation token.

use std::future::Future;
use std::time::Duration;

use rompatch::catalog::{Catalog, CatalogSource, DirectoryListing, GitHubTreeListing};
use rompatch::config::ConfigFile;
use rompatch::fetch::SourceFetcher;
use rompatch::logging::{init_logging, LogGuard};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::CliError;

/// Global flags that override configuration file values.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source: Option<String>,
    pub log_level: Option<String>,
}

pub struct CliRunner {
    config: ConfigFile,
    runtime: Runtime,
    cancel: CancellationToken,
    _log_guard: LogGuard,
}

impl CliRunner {
    pub fn new(overrides: Overrides) -> Result<Self, CliError> {
        let mut config = ConfigFile::load()?;
        if let Some(source) = overrides.source {
            config.catalog.source = source;
            // A raw root configured for another source no longer applies.
            config.catalog.raw_root = None;
        }
        if let Some(level) = overrides.log_level {
            config.logging.level = level;
        }

        let log_guard = init_logging(&config.logging.level, config.logging.file.as_deref())?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        ctrlc::set_handler(move || {
            eprintln!();
            eprintln!("Received interrupt, cancelling...");
            trigger.cancel();
        })
        .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

        Ok(Self {
            config,
            runtime,
            cancel,
            _log_guard: log_guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn cancel(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn log_startup(&self, command: &str) {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            command = command,
            source = %self.config.catalog.source,
            "rompatch starting"
        );
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn catalog_source(&self) -> Result<CatalogSource, CliError> {
        Ok(self.config.catalog.source.parse()?)
    }

    /// Root URL patch paths are resolved against.
    pub fn base_url(&self) -> Result<String, CliError> {
        match &self.config.catalog.raw_root {
            Some(root) => Ok(root.clone()),
            None => Ok(self.catalog_source()?.raw_root()?),
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.catalog.timeout_secs)
    }

    /// List and rebuild the configured catalog.
    pub fn load_catalog(&self) -> Result<Catalog, CliError> {
        let source = self.catalog_source()?;
        debug!(source = %source, "Resolving catalog source");

        // TreeListing is not object safe, so each source loads on its own arm.
        let catalog = match source {
            CatalogSource::GitHub(repo) => {
                let listing = GitHubTreeListing::with_timeout(repo, self.timeout())?;
                self.block_on(Catalog::load(&listing, &self.cancel))?
            }
            CatalogSource::Directory(dir) => {
                let listing = DirectoryListing::new(dir);
                self.block_on(Catalog::load(&listing, &self.cancel))?
            }
        };

        Ok(catalog)
    }

    pub fn fetcher(&self) -> Result<SourceFetcher, CliError> {
        Ok(SourceFetcher::with_timeout(self.timeout())?)
    }
}
