//! Apply command - patch a ROM with the resolved patch set.

use std::path::{Path, PathBuf};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rompatch::integrity::{check_rom, sha256_hex, HashCheck};
use rompatch::orchestrator::{load_rom, save_output, Orchestrator, PatchStage};

use super::common::{resolve_descriptors, OptionArgs};
use crate::error::CliError;
use crate::runner::{CliRunner, Overrides};

/// Arguments for the apply command.
pub struct ApplyArgs {
    pub rom: PathBuf,
    pub output: Option<PathBuf>,
    pub options: OptionArgs,
    pub skip_hash_check: bool,
}

/// Run the apply command.
pub fn run(overrides: Overrides, args: ApplyArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(overrides)?;
    runner.log_startup("apply");
    let config = runner.config();

    let rom = runner.block_on(load_rom(&args.rom, runner.cancel()))?;
    if !args.skip_hash_check {
        if let HashCheck::Mismatch { expected, actual } =
            check_rom(&rom, &config.rom.expected_sha256)
        {
            println!(
                "{} {} does not look like a clean ROM",
                style("warning:").yellow().bold(),
                args.rom.display()
            );
            println!("  expected sha256 {}", expected);
            println!("  actual   sha256 {}", actual);
            println!();
        }
    }

    let (version, descriptors) = resolve_descriptors(&runner, &args.options)?;
    let output = output_path(&args.rom, args.output.as_deref(), &config.output.file_name);

    println!("Patching with version {}", style(&version).bold());
    println!("  ROM:     {}", args.rom.display());
    println!("  Output:  {}", output.display());
    println!("  Patches: {}", descriptors.len());
    println!();

    let progress = progress_bar(descriptors.len() as u64);
    let bar = progress.clone();
    let orchestrator = Orchestrator::new(runner.fetcher()?).with_progress(Box::new(
        move |stage, index, _total, descriptor| match stage {
            PatchStage::Fetching => {
                bar.set_position(index as u64);
                bar.set_message(format!("{} {}", stage.name(), descriptor.key));
            }
            PatchStage::Applying => {
                bar.set_message(format!("{} {}", stage.name(), descriptor.key));
            }
            PatchStage::Complete => {
                bar.set_position(index as u64);
                bar.set_message(stage.name().to_string());
            }
        },
    ));

    let patched = match runner.block_on(orchestrator.run(rom, &descriptors, runner.cancel())) {
        Ok(patched) => patched,
        Err(e) => {
            progress.abandon_with_message("Aborted");
            return Err(e.into());
        }
    };
    progress.finish_with_message("Done");

    let saved = runner.block_on(save_output(&patched, &output, runner.cancel()))?;

    println!();
    println!(
        "{} {}",
        style("Patched ROM written to").green(),
        saved.display()
    );
    println!("  sha256 {}", sha256_hex(patched.as_bytes()));
    Ok(())
}

/// Explicit output path, or the configured file name next to the ROM.
fn output_path(rom: &Path, explicit: Option<&Path>, file_name: &str) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => rom
            .parent()
            .map(|dir| dir.join(file_name))
            .unwrap_or_else(|| PathBuf::from(file_name)),
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    bar.enable_steady_tick(std::time::Duration::from_millis(100));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_defaults_next_to_rom() {
        let path = output_path(Path::new("/roms/emerald.gba"), None, "patched.gba");
        assert_eq!(path, PathBuf::from("/roms/patched.gba"));
    }

    #[test]
    fn test_output_path_explicit() {
        let path = output_path(
            Path::new("/roms/emerald.gba"),
            Some(Path::new("/tmp/out.gba")),
            "patched.gba",
        );
        assert_eq!(path, PathBuf::from("/tmp/out.gba"));
    }

    #[test]
    fn test_output_path_bare_rom_name() {
        let path = output_path(Path::new("emerald.gba"), None, "patched.gba");
        assert_eq!(path, PathBuf::from("patched.gba"));
    }
}
