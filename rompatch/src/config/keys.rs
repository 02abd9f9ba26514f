//! Addressable configuration keys for `config get` / `config set`.

use std::path::PathBuf;
use std::str::FromStr;

use reqwest::Url;

use super::file::{parse_timeout, ConfigFile, ConfigFileError};
use crate::catalog::CatalogSource;

/// Log levels accepted by `logging.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A `section.key` entry of the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    CatalogSource,
    CatalogRawRoot,
    CatalogTimeoutSecs,
    RomExpectedSha256,
    OutputFileName,
    LoggingLevel,
    LoggingFile,
}

impl ConfigKey {
    /// Every key, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::CatalogSource,
            ConfigKey::CatalogRawRoot,
            ConfigKey::CatalogTimeoutSecs,
            ConfigKey::RomExpectedSha256,
            ConfigKey::OutputFileName,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingFile,
        ]
    }

    /// Full `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::CatalogSource => "catalog.source",
            ConfigKey::CatalogRawRoot => "catalog.raw_root",
            ConfigKey::CatalogTimeoutSecs => "catalog.timeout_secs",
            ConfigKey::RomExpectedSha256 => "rom.expected_sha256",
            ConfigKey::OutputFileName => "output.file_name",
            ConfigKey::LoggingLevel => "logging.level",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    pub fn section(&self) -> &'static str {
        self.name().split_once('.').map(|(s, _)| s).unwrap_or_default()
    }

    pub fn key_name(&self) -> &'static str {
        self.name().split_once('.').map(|(_, k)| k).unwrap_or_default()
    }

    /// Current value as text; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::CatalogSource => config.catalog.source.clone(),
            ConfigKey::CatalogRawRoot => config.catalog.raw_root.clone().unwrap_or_default(),
            ConfigKey::CatalogTimeoutSecs => config.catalog.timeout_secs.to_string(),
            ConfigKey::RomExpectedSha256 => config.rom.expected_sha256.clone(),
            ConfigKey::OutputFileName => config.output.file_name.clone(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFile => config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Validate and store `value`. An empty value clears optional keys.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigFileError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigFileError::InvalidValue {
            key: self.name().to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match self {
            ConfigKey::CatalogSource => {
                CatalogSource::from_str(value).map_err(|e| invalid(&e.to_string()))?;
                config.catalog.source = value.to_string();
            }
            ConfigKey::CatalogRawRoot => {
                if value.is_empty() {
                    config.catalog.raw_root = None;
                } else {
                    Url::parse(value).map_err(|e| invalid(&e.to_string()))?;
                    config.catalog.raw_root = Some(value.to_string());
                }
            }
            ConfigKey::CatalogTimeoutSecs => {
                config.catalog.timeout_secs = parse_timeout(value)?;
            }
            ConfigKey::RomExpectedSha256 => {
                if value.len() != 64 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(invalid("expected 64 hexadecimal characters"));
                }
                config.rom.expected_sha256 = value.to_ascii_lowercase();
            }
            ConfigKey::OutputFileName => {
                if value.is_empty() {
                    return Err(invalid("file name cannot be empty"));
                }
                config.output.file_name = value.to_string();
            }
            ConfigKey::LoggingLevel => {
                let level = value.to_ascii_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(invalid("expected one of trace, debug, info, warn, error"));
                }
                config.logging.level = level;
            }
            ConfigKey::LoggingFile => {
                config.logging.file = (!value.is_empty()).then(|| PathBuf::from(value));
            }
        }

        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| ConfigFileError::InvalidValue {
                key: "key".to_string(),
                value: s.to_string(),
                reason: "unknown configuration key".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
        assert_eq!(
            "CATALOG.SOURCE".parse::<ConfigKey>().unwrap(),
            ConfigKey::CatalogSource
        );
        assert!("catalog.nope".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_section_and_key_name() {
        assert_eq!(ConfigKey::RomExpectedSha256.section(), "rom");
        assert_eq!(ConfigKey::RomExpectedSha256.key_name(), "expected_sha256");
    }

    #[test]
    fn test_set_and_get() {
        let mut config = ConfigFile::default();

        ConfigKey::CatalogSource.set(&mut config, "/srv/mirror").unwrap();
        assert_eq!(ConfigKey::CatalogSource.get(&config), "/srv/mirror");

        ConfigKey::CatalogTimeoutSecs.set(&mut config, "45").unwrap();
        assert_eq!(config.catalog.timeout_secs, 45);

        ConfigKey::LoggingLevel.set(&mut config, "DEBUG").unwrap();
        assert_eq!(config.logging.level, "debug");

        ConfigKey::LoggingFile.set(&mut config, "/tmp/log.txt").unwrap();
        assert_eq!(ConfigKey::LoggingFile.get(&config), "/tmp/log.txt");
        ConfigKey::LoggingFile.set(&mut config, "").unwrap();
        assert_eq!(config.logging.file, None);
        assert_eq!(ConfigKey::LoggingFile.get(&config), "");
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = ConfigFile::default();

        assert!(ConfigKey::CatalogSource.set(&mut config, "nope").is_err());
        assert!(ConfigKey::CatalogRawRoot.set(&mut config, "not a url").is_err());
        assert!(ConfigKey::CatalogTimeoutSecs.set(&mut config, "0").is_err());
        assert!(ConfigKey::RomExpectedSha256.set(&mut config, "abc").is_err());
        assert!(ConfigKey::OutputFileName.set(&mut config, " ").is_err());
        assert!(ConfigKey::LoggingLevel.set(&mut config, "loud").is_err());

        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_raw_root_can_be_cleared() {
        let mut config = ConfigFile::default();
        ConfigKey::CatalogRawRoot
            .set(&mut config, "https://mirror.example.com/p")
            .unwrap();
        assert_eq!(
            config.catalog.raw_root.as_deref(),
            Some("https://mirror.example.com/p")
        );
        ConfigKey::CatalogRawRoot.set(&mut config, "").unwrap();
        assert_eq!(config.catalog.raw_root, None);
    }
}
