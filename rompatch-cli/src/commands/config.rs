//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path` commands
//! for viewing and modifying `~/.rompatch/config.ini` from the command line.

use std::path::Path;

use clap::Subcommand;
use rompatch::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., catalog.source)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., catalog.source)
        key: String,

        /// Value to set (an empty string clears optional keys)
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    let path = config_file_path();
    match command {
        ConfigCommands::Get { key } => run_get(&path, &key),
        ConfigCommands::Set { key, value } => run_set(&path, &key, &value),
        ConfigCommands::List => run_list(&path),
        ConfigCommands::Path => run_path(&path),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse::<ConfigKey>().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'rompatch config list' to see available keys.",
            key
        ))
    })
}

/// Get a configuration value.
fn run_get(path: &Path, key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load_or_default(path).unwrap_or_default();
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

/// Set a configuration value.
fn run_set(path: &Path, key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let mut config = ConfigFile::load_or_default(path).unwrap_or_default();
    config_key
        .set(&mut config, value)
        .map_err(|e| CliError::Config(e.to_string()))?;
    config.save_to(path)?;

    println!("Set {} = {}", config_key.name(), value);

    Ok(())
}

/// List all configuration settings.
fn run_list(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_or_default(path).unwrap_or_default();

    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        let value = key.get(&config);
        if value.is_empty() {
            println!("  {} = (not set)", key.key_name());
        } else {
            println!("  {} = {}", key.key_name(), value);
        }
    }

    Ok(())
}

/// Show the configuration file path.
fn run_path(path: &Path) -> Result<(), CliError> {
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("catalog.source").unwrap(), ConfigKey::CatalogSource);
        assert!(matches!(parse_key("catalog.nope"), Err(CliError::Config(_))));
    }

    #[test]
    fn test_set_then_get() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".rompatch").join("config.ini");

        run_set(&path, "output.file_name", "final.gba").unwrap();
        run_set(&path, "catalog.timeout_secs", "45").unwrap();
        run_get(&path, "output.file_name").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.output.file_name, "final.gba");
        assert_eq!(config.catalog.timeout_secs, 45);
        assert_eq!(ConfigKey::OutputFileName.get(&config), "final.gba");
    }

    #[test]
    fn test_set_rejects_invalid_value() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        let result = run_set(&path, "catalog.timeout_secs", "soon");
        assert!(matches!(result, Err(CliError::Config(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_get_unknown_key() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        assert!(matches!(
            run_get(&path, "rom.nope"),
            Err(CliError::Config(_))
        ));
        run_list(&path).unwrap();
    }
}
