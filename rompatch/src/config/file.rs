//! INI configuration file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::catalog::DEFAULT_CATALOG_SOURCE;
use crate::fetch::DEFAULT_TIMEOUT_SECS;
use crate::integrity::EXPECTED_ROM_SHA256;
use crate::orchestrator::DEFAULT_OUTPUT_NAME;

/// Directory name under the home directory.
const CONFIG_DIR_NAME: &str = ".rompatch";

/// Configuration file name.
const CONFIG_FILE_NAME: &str = "config.ini";

/// Default log level filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// `[catalog]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    /// `owner/repo/branch` or a local mirror path.
    pub source: String,
    /// Overrides the patch download root derived from `source`.
    pub raw_root: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            source: DEFAULT_CATALOG_SOURCE.to_string(),
            raw_root: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[rom]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomSettings {
    pub expected_sha256: String,
}

impl Default for RomSettings {
    fn default() -> Self {
        Self {
            expected_sha256: EXPECTED_ROM_SHA256.to_string(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub file_name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
    /// Log file; stderr only when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

/// Contents of `~/.rompatch/config.ini`.
///
/// Missing sections and keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFile {
    pub catalog: CatalogSettings,
    pub rom: RomSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default location, or defaults when no file exists.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_or_default(&config_file_path())
    }

    /// Load from `path`, or defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let ini = Ini::load_from_str(&content).map_err(|e| ConfigFileError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config = Self::default();

        if let Some(source) = non_empty(ini.get_from(Some("catalog"), "source")) {
            config.catalog.source = source.to_string();
        }
        config.catalog.raw_root =
            non_empty(ini.get_from(Some("catalog"), "raw_root")).map(String::from);
        if let Some(timeout) = non_empty(ini.get_from(Some("catalog"), "timeout_secs")) {
            config.catalog.timeout_secs = parse_timeout(timeout)?;
        }

        if let Some(hash) = non_empty(ini.get_from(Some("rom"), "expected_sha256")) {
            config.rom.expected_sha256 = hash.to_ascii_lowercase();
        }

        if let Some(name) = non_empty(ini.get_from(Some("output"), "file_name")) {
            config.output.file_name = name.to_string();
        }

        if let Some(level) = non_empty(ini.get_from(Some("logging"), "level")) {
            config.logging.level = level.to_string();
        }
        config.logging.file = non_empty(ini.get_from(Some("logging"), "file")).map(PathBuf::from);

        Ok(config)
    }

    /// Save to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigFileError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("catalog"))
            .set("source", self.catalog.source.as_str())
            .set("raw_root", self.catalog.raw_root.clone().unwrap_or_default())
            .set("timeout_secs", self.catalog.timeout_secs.to_string());
        ini.with_section(Some("rom"))
            .set("expected_sha256", self.rom.expected_sha256.as_str());
        ini.with_section(Some("output"))
            .set("file_name", self.output.file_name.as_str());
        ini.with_section(Some("logging"))
            .set("level", self.logging.level.as_str())
            .set(
                "file",
                self.logging
                    .file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            );

        ini.write_to_file(path).map_err(|source| ConfigFileError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "Saved config file");
        Ok(())
    }
}

pub(crate) fn parse_timeout(value: &str) -> Result<u64, ConfigFileError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigFileError::InvalidValue {
            key: "catalog.timeout_secs".to_string(),
            value: value.to_string(),
            reason: "expected a positive number of seconds".to_string(),
        }),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `~/.rompatch`, or `./.rompatch` when the home directory is unknown.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Full path of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}
