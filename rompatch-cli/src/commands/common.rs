//! Option flags and helpers shared by `plan` and `apply`.

use clap::Args;
use rompatch::catalog::Catalog;
use rompatch::orchestrator::{
    resolve, Base, OrchestratorError, PatchDescriptor, PatchOptions, Variant,
};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Patch selection flags.
#[derive(Debug, Clone, Default, Args)]
pub struct OptionArgs {
    /// Catalog version to patch with (defaults to the newest)
    #[arg(long = "patch-version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Base build: deluxe or legacy
    #[arg(long)]
    pub base: Option<String>,

    /// Wild encounter variant: new_wilds, vanilla_wilds or vanilla_wilds_plus
    #[arg(long)]
    pub variant: Option<String>,

    /// Include the Gen VI exp share
    #[arg(long)]
    pub exp_share: bool,

    /// Enable a toggle add-on (repeatable, e.g. --toggle prng_fix)
    #[arg(long = "toggle", value_name = "KEY")]
    pub toggles: Vec<String>,

    /// Pick a choice for a selectable add-on (repeatable, e.g. --select sprites=moemon)
    #[arg(long = "select", value_name = "KEY=CHOICE")]
    pub selections: Vec<String>,
}

impl OptionArgs {
    /// Build and validate the patch options these flags describe.
    pub fn to_options(&self) -> Result<PatchOptions, CliError> {
        let mut options = PatchOptions::new().with_exp_share(self.exp_share);

        if let Some(base) = &self.base {
            options = options.with_base(base.parse::<Base>()?);
        }
        if let Some(variant) = &self.variant {
            options = options.with_variant(variant.parse::<Variant>()?);
        }
        for toggle in &self.toggles {
            options.enable(toggle)?;
        }
        for selection in &self.selections {
            let (key, value) = parse_selection(selection)?;
            options.select(key, value)?;
        }

        options.validate()?;
        Ok(options)
    }
}

/// Split a `key=choice` flag.
pub fn parse_selection(text: &str) -> Result<(&str, &str), CliError> {
    match text.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
            Ok((key.trim(), value.trim()))
        }
        _ => Err(CliError::Config(format!(
            "Invalid selection '{}'. Expected KEY=CHOICE, e.g. sprites=moemon",
            text
        ))),
    }
}

/// The requested version, or the catalog's newest when none was given.
pub fn pick_version(catalog: &Catalog, requested: Option<&str>) -> Result<String, CliError> {
    match requested {
        Some(version) if catalog.group(version).is_some() => Ok(version.to_string()),
        Some(version) => Err(OrchestratorError::UnknownVersion(version.to_string()).into()),
        None => catalog
            .default_version()
            .map(str::to_string)
            .ok_or_else(|| {
                CliError::Config(format!("Catalog {} has no versions", catalog.location()))
            }),
    }
}

/// Load the catalog and resolve the flags into ordered descriptors.
pub fn resolve_descriptors(
    runner: &CliRunner,
    args: &OptionArgs,
) -> Result<(String, Vec<PatchDescriptor>), CliError> {
    let options = args.to_options()?;
    let catalog = runner.load_catalog()?;
    let version = pick_version(&catalog, args.version.as_deref())?;
    let base_url = runner.base_url()?;

    let group = catalog
        .group(&version)
        .ok_or_else(|| OrchestratorError::UnknownVersion(version.clone()))?;
    let descriptors = resolve(group, &version, &options, &base_url)?;

    Ok((version, descriptors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_paths("test", ["7.3", "7.4", "7.4/a.ips"]).unwrap()
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("sprites=moemon").unwrap(), ("sprites", "moemon"));
        assert_eq!(parse_selection(" egg = tyrogue ").unwrap(), ("egg", "tyrogue"));
        assert!(parse_selection("sprites").is_err());
        assert!(parse_selection("=moemon").is_err());
        assert!(parse_selection("sprites=").is_err());
    }

    #[test]
    fn test_to_options() {
        let args = OptionArgs {
            base: Some("legacy".to_string()),
            variant: Some("vanilla-wilds".to_string()),
            toggles: vec!["prng_fix".to_string(), "gen4_lite_movesets".to_string()],
            selections: vec!["sprites=moemon".to_string()],
            ..Default::default()
        };

        let options = args.to_options().unwrap();
        assert_eq!(options.base, Base::Legacy);
        assert_eq!(options.variant, Variant::VanillaWilds);
        assert!(options.is_enabled("prng_fix"));
        assert_eq!(options.selection("sprites").unwrap().key, "moemon");
    }

    #[test]
    fn test_to_options_rejects_unmet_requirement() {
        let args = OptionArgs {
            toggles: vec!["gen4_lite_movesets".to_string()],
            ..Default::default()
        };
        assert!(matches!(args.to_options(), Err(CliError::Patcher(_))));
    }

    #[test]
    fn test_to_options_rejects_unknown_toggle() {
        let args = OptionArgs {
            toggles: vec!["turbo".to_string()],
            ..Default::default()
        };
        assert!(args.to_options().is_err());
    }

    #[test]
    fn test_pick_version() {
        let catalog = catalog();
        assert_eq!(pick_version(&catalog, None).unwrap(), "7.4");
        assert_eq!(pick_version(&catalog, Some("7.3")).unwrap(), "7.3");
        assert!(pick_version(&catalog, Some("9.9")).is_err());
    }
}
