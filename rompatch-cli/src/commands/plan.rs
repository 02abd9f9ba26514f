//! Plan command - show which patches a set of options resolves to.

use console::style;

use super::common::{resolve_descriptors, OptionArgs};
use crate::error::CliError;
use crate::runner::{CliRunner, Overrides};

/// Run the plan command.
pub fn run(overrides: Overrides, args: OptionArgs, show_urls: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(overrides)?;
    runner.log_startup("plan");

    let (version, descriptors) = resolve_descriptors(&runner, &args)?;

    println!("Patch plan for version {}", style(&version).bold());
    println!("========================");
    println!();

    for (index, descriptor) in descriptors.iter().enumerate() {
        println!(
            "  {:>2}. {:<28} {} {}",
            index + 1,
            style(&descriptor.key).cyan(),
            descriptor.path,
            style(format!("(priority {})", descriptor.priority)).dim()
        );
        if show_urls {
            println!("      {}", style(&descriptor.url).dim());
        }
    }

    println!();
    println!("{} patches, applied top to bottom.", descriptors.len());
    Ok(())
}
