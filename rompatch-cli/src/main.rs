//! rompatch CLI - Command-line interface
//!
//! Lists catalog versions, previews patch plans and applies the resolved
//! IPS patches to a ROM image.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use console::style;

use commands::apply::ApplyArgs;
use commands::common::OptionArgs;
use commands::config::ConfigCommands;
use error::CliError;
use runner::Overrides;

#[derive(Parser)]
#[command(name = "rompatch")]
#[command(version, about = "Apply versioned IPS patch sets to a ROM image", long_about = None)]
struct Cli {
    /// Catalog source: owner/repo/branch, a file:// URL or a local mirror path
    #[arg(long, global = true)]
    source: Option<String>,

    /// Log level filter (e.g. debug, rompatch=trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the versions available in the catalog
    Versions,

    /// Show the patches the given options resolve to, in application order
    Plan {
        #[command(flatten)]
        options: OptionArgs,

        /// Also print each patch URL
        #[arg(long)]
        urls: bool,
    },

    /// Patch a ROM and write the result
    Apply {
        /// Path to the clean ROM image
        rom: PathBuf,

        /// Output path (defaults to the configured file name next to the ROM)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: OptionArgs,

        /// Do not warn when the ROM hash differs from the expected one
        #[arg(long)]
        skip_hash_check: bool,
    },

    /// Summarise a local IPS patch file
    Inspect {
        /// Path to the patch file
        patch: PathBuf,

        /// List every record
        #[arg(long)]
        records: bool,
    },

    /// View or modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let overrides = Overrides {
        source: cli.source,
        log_level: cli.log_level,
    };

    let result = match cli.command {
        Commands::Versions => commands::versions::run(overrides),
        Commands::Plan { options, urls } => commands::plan::run(overrides, options, urls),
        Commands::Apply {
            rom,
            output,
            options,
            skip_hash_check,
        } => commands::apply::run(
            overrides,
            ApplyArgs {
                rom,
                output,
                options,
                skip_hash_check,
            },
        ),
        Commands::Inspect { patch, records } => commands::inspect::run(&patch, records),
        Commands::Config { command } => commands::config::run(command),
    };

    let code = finish(result);
    if code != 0 {
        process::exit(code);
    }
}

/// Print a failed command's error and pick the exit code.
///
/// A cancelled run ends quietly; the interrupt handler has already said so.
fn finish(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) | Err(CliError::Cancelled) => 0,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_exit_codes() {
        assert_eq!(finish(Ok(())), 0);
        assert_eq!(finish(Err(CliError::Cancelled)), 0);
        assert_eq!(finish(Err(CliError::Config("bad".to_string()))), 2);
    }
}
