//! Turning options into an ordered list of patch descriptors.

use std::fmt;

use reqwest::Url;
use tracing::debug;

use super::error::OrchestratorError;
use super::options::{Base, PatchOptions, Variant, EXP_SHARE};
use crate::catalog::{CatalogPath, PatchGroup, PatchRef};
use crate::format::PatchMethod;

/// Directory holding the Legacy base builds.
pub const LEGACY_ROOT: &str = "Legacy Variant";

/// Directory holding the Deluxe base builds.
pub const DELUXE_ROOT: &str = "Deluxe Variant";

/// Deluxe build directory with the Gen VI exp share included.
pub const DELUXE_EXP_SHARE_ROOT: &str = "Deluxe With Gen VI Exp Share";

/// Deluxe build directory without the Gen VI exp share.
pub const DELUXE_NO_EXP_SHARE_ROOT: &str = "Deluxe No Gen VI Exp Share";

/// Directory holding add-on patches.
pub const OPTIONAL_ROOT: &str = "Optional Patches";

/// Key of the base patch descriptor.
pub const BASE_KEY: &str = "base";

/// A resolved, fetchable patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchDescriptor {
    /// Option key the patch was resolved for.
    pub key: String,
    pub method: PatchMethod,
    pub url: String,
    /// Lower priorities are applied first.
    pub priority: i32,
    /// Catalog location inside the version directory.
    pub path: CatalogPath,
}

impl fmt::Display for PatchDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}, priority {})",
            self.key, self.path, self.method, self.priority
        )
    }
}

/// Resolve `options` against the `version` group of the catalog.
///
/// The base patch is discovered first, then exp share (Legacy only), then
/// selectable add-ons, then toggles. The result is stably sorted by
/// priority, so equal priorities keep that discovery order.
pub fn resolve(
    group: &PatchGroup,
    version: &str,
    options: &PatchOptions,
    base_url: &str,
) -> Result<Vec<PatchDescriptor>, OrchestratorError> {
    options.validate()?;

    let base = Url::parse(base_url)
        .map_err(|_| OrchestratorError::InvalidBaseUrl(base_url.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(OrchestratorError::InvalidBaseUrl(base_url.to_string()));
    }

    let mut descriptors = Vec::new();

    let base_patch = match options.base {
        Base::Legacy => resolve_legacy(group, options.variant)?,
        Base::Deluxe => resolve_deluxe(group, options.variant, options.exp_share)?,
    };
    descriptors.push(describe(&base, version, BASE_KEY, 0, base_patch)?);

    if options.exp_share && options.base == Base::Legacy {
        let patch = lookup(group, &[OPTIONAL_ROOT, &ips_name(EXP_SHARE.label)])?;
        descriptors.push(describe(&base, version, EXP_SHARE.key, EXP_SHARE.priority, patch)?);
    }

    for (addon, choice) in options.active_selections() {
        let patch = lookup(group, &[OPTIONAL_ROOT, addon.label, &ips_name(choice.label)])?;
        descriptors.push(describe(&base, version, addon.key, addon.priority, patch)?);
    }

    for addon in options.enabled_toggles() {
        let patch = lookup(group, &[OPTIONAL_ROOT, &ips_name(addon.label)])?;
        descriptors.push(describe(&base, version, addon.key, addon.priority, patch)?);
    }

    descriptors.sort_by_key(|d| d.priority);

    debug!(
        version = version,
        base = %options.base,
        variant = %options.variant,
        patches = descriptors.len(),
        "Resolved patch descriptors"
    );

    Ok(descriptors)
}

/// Build a patch URL: `base_url/version/segment/.../name`, each segment
/// percent-encoded.
pub fn patch_url(
    base_url: &str,
    version: &str,
    path: &CatalogPath,
) -> Result<String, OrchestratorError> {
    let base = Url::parse(base_url)
        .map_err(|_| OrchestratorError::InvalidBaseUrl(base_url.to_string()))?;
    join_url(&base, version, path)
}

fn join_url(base: &Url, version: &str, path: &CatalogPath) -> Result<String, OrchestratorError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| OrchestratorError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .push(version)
        .extend(path.segments());
    Ok(url.into())
}

fn describe(
    base: &Url,
    version: &str,
    key: &str,
    priority: i32,
    patch: &PatchRef,
) -> Result<PatchDescriptor, OrchestratorError> {
    Ok(PatchDescriptor {
        key: key.to_string(),
        method: patch.method,
        url: join_url(base, version, &patch.path)?,
        priority,
        path: patch.path.clone(),
    })
}

fn ips_name(stem: &str) -> String {
    format!("{}.{}", stem, PatchMethod::Ips.extension())
}

/// Find the patch file at `path`.
fn lookup<'a>(group: &'a PatchGroup, path: &[&str]) -> Result<&'a PatchRef, OrchestratorError> {
    group
        .get(path)
        .and_then(|entry| entry.patch.as_ref())
        .ok_or_else(|| OrchestratorError::NotInCatalog {
            path: path.join("/"),
        })
}

/// First Legacy build, in key order, whose name ends with the variant label.
fn resolve_legacy(group: &PatchGroup, variant: Variant) -> Result<&PatchRef, OrchestratorError> {
    let suffix = format!(" - {}", ips_name(variant.label()));

    group
        .entry(LEGACY_ROOT)
        .and_then(|root| {
            root.children
                .iter()
                .find(|(name, entry)| name.ends_with(&suffix) && entry.patch.is_some())
                .and_then(|(_, entry)| entry.patch.as_ref())
        })
        .ok_or_else(|| OrchestratorError::NotInCatalog {
            path: format!("{}/*{}", LEGACY_ROOT, suffix),
        })
}

fn resolve_deluxe(
    group: &PatchGroup,
    variant: Variant,
    exp_share: bool,
) -> Result<&PatchRef, OrchestratorError> {
    let root = if exp_share {
        DELUXE_EXP_SHARE_ROOT
    } else {
        DELUXE_NO_EXP_SHARE_ROOT
    };
    let file = match variant {
        Variant::NewWilds => ips_name(root),
        Variant::VanillaWilds | Variant::VanillaWildsPlus => {
            ips_name(&format!("{} - {}", root, variant.label()))
        }
    };

    lookup(group, &[DELUXE_ROOT, root, &file])
}
