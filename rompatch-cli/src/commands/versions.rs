//! Versions command - list the releases in the catalog.

use console::style;

use crate::error::CliError;
use crate::runner::{CliRunner, Overrides};

/// Run the versions command.
pub fn run(overrides: Overrides) -> Result<(), CliError> {
    let runner = CliRunner::new(overrides)?;
    runner.log_startup("versions");

    let catalog = runner.load_catalog()?;
    let default = catalog.default_version();

    println!("Catalog: {}", catalog.location());
    println!();

    if catalog.groups().is_empty() {
        println!("No versions found.");
        return Ok(());
    }

    for version in catalog.versions() {
        let patches = catalog
            .group(version)
            .map(|group| group.collect::<&str>(&[]).len())
            .unwrap_or(0);

        if Some(version) == default {
            println!(
                "  {} {} ({} patches)",
                style(version).green().bold(),
                style("(default)").dim(),
                patches
            );
        } else {
            println!("  {} ({} patches)", version, patches);
        }
    }

    Ok(())
}
