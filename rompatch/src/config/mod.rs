//! Persistent configuration.
//!
//! Settings live in `~/.rompatch/config.ini`:
//!
//! ```ini
//! [catalog]
//! source = elizabethlfransen/emerald-final-patches/main
//! raw_root =
//! timeout_secs = 30
//!
//! [rom]
//! expected_sha256 = a9dec84dfe7f62ab2220bafaef7479da0929d066ece16a6885f6226db19085af
//!
//! [output]
//! file_name = patched.gba
//!
//! [logging]
//! level = info
//! file =
//! ```
//!
//! Command line flags override these values.

mod file;
mod keys;

pub use file::{
    config_directory, config_file_path, CatalogSettings, ConfigFile, ConfigFileError,
    LoggingSettings, OutputSettings, RomSettings, DEFAULT_LOG_LEVEL,
};
pub use keys::ConfigKey;
