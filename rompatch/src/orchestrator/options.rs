//! The patch option model.
//!
//! A full build is one base patch (chosen by [`Base`], [`Variant`] and the
//! exp share flag) plus any number of optional add-ons from
//! `Optional Patches/`. Add-ons are either toggles (one patch file, on or
//! off) or selectables (a sub-directory holding one file per choice, where
//! the first choice means "leave the ROM alone").

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use super::error::OrchestratorError;

/// Which base game build to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Base {
    #[default]
    Deluxe,
    Legacy,
}

impl Base {
    pub const ALL: [Base; 2] = [Base::Deluxe, Base::Legacy];

    pub fn key(&self) -> &'static str {
        match self {
            Base::Deluxe => "deluxe",
            Base::Legacy => "legacy",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Base::Deluxe => "Deluxe",
            Base::Legacy => "Legacy",
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Base {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Base::ALL
            .into_iter()
            .find(|b| b.key() == key)
            .ok_or_else(|| OrchestratorError::UnknownChoice {
                option: "base".to_string(),
                value: s.to_string(),
            })
    }
}

/// Wild encounter variant of the base build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    #[default]
    NewWilds,
    VanillaWilds,
    VanillaWildsPlus,
}

impl Variant {
    pub const ALL: [Variant; 3] = [
        Variant::NewWilds,
        Variant::VanillaWilds,
        Variant::VanillaWildsPlus,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Variant::NewWilds => "new_wilds",
            Variant::VanillaWilds => "vanilla_wilds",
            Variant::VanillaWildsPlus => "vanilla_wilds_plus",
        }
    }

    /// Label used in catalog file names.
    pub fn label(&self) -> &'static str {
        match self {
            Variant::NewWilds => "New Wilds",
            Variant::VanillaWilds => "Vanilla Wilds",
            Variant::VanillaWildsPlus => "Vanilla Wilds Plus",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Variant {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Variant::ALL
            .into_iter()
            .find(|v| v.key() == key)
            .ok_or_else(|| OrchestratorError::UnknownChoice {
                option: "variant".to_string(),
                value: s.to_string(),
            })
    }
}

/// Condition an add-on places on the rest of the options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Always,
    Base(Base),
}

impl Requirement {
    pub fn holds(&self, options: &PatchOptions) -> bool {
        match self {
            Requirement::Always => true,
            Requirement::Base(base) => options.base == *base,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Always => f.write_str("always available"),
            Requirement::Base(base) => write!(f, "requires the {} base", base),
        }
    }
}

/// One value of a selectable add-on.
#[derive(Debug, PartialEq, Eq)]
pub struct Choice {
    pub key: &'static str,
    pub label: &'static str,
}

/// Add-on with several mutually exclusive patch files.
#[derive(Debug, PartialEq, Eq)]
pub struct SelectableAddOn {
    pub key: &'static str,
    pub label: &'static str,
    pub priority: i32,
    /// The first choice is the default and patches nothing.
    pub choices: &'static [Choice],
}

impl SelectableAddOn {
    pub fn default_choice(&self) -> &'static Choice {
        &self.choices[0]
    }

    /// Find a choice by key or label, ignoring case and separators.
    pub fn choice(&self, value: &str) -> Option<&'static Choice> {
        let wanted = normalize(value);
        self.choices
            .iter()
            .find(|c| c.key == wanted || normalize(c.label) == wanted)
    }
}

/// Add-on backed by a single patch file.
#[derive(Debug, PartialEq, Eq)]
pub struct ToggleAddOn {
    pub key: &'static str,
    pub label: &'static str,
    pub priority: i32,
    pub requirement: Requirement,
}

const fn toggle(key: &'static str, label: &'static str) -> ToggleAddOn {
    ToggleAddOn {
        key,
        label,
        priority: 0,
        requirement: Requirement::Always,
    }
}

const DEFAULT: Choice = Choice {
    key: "default",
    label: "Default",
};

/// Selectable add-ons in discovery order.
pub static SELECTABLE_ADD_ONS: &[SelectableAddOn] = &[
    SelectableAddOn {
        key: "day_night",
        label: "Day Night System",
        priority: 0,
        choices: &[
            DEFAULT,
            Choice {
                key: "in_battle",
                label: "DNS In-Battle",
            },
            Choice {
                key: "disable",
                label: "Disable",
            },
        ],
    },
    SelectableAddOn {
        key: "egg",
        label: "Free Egg Pokemon",
        priority: 0,
        choices: &[
            DEFAULT,
            Choice {
                key: "wynaut",
                label: "Wynaut",
            },
            Choice {
                key: "tyrogue",
                label: "Tyrogue",
            },
        ],
    },
    SelectableAddOn {
        key: "move_stats",
        label: "Move Stats",
        priority: 0,
        choices: &[
            DEFAULT,
            Choice {
                key: "gen4",
                label: "Gen IV",
            },
            Choice {
                key: "gen5",
                label: "Gen V",
            },
            Choice {
                key: "gen6",
                label: "Gen VI",
            },
        ],
    },
    SelectableAddOn {
        key: "sprites",
        label: "Sprites",
        priority: -1,
        choices: &[
            DEFAULT,
            Choice {
                key: "gen4",
                label: "Gen IV",
            },
            Choice {
                key: "moemon",
                label: "Moemon",
            },
        ],
    },
];

/// Toggle add-ons in discovery order.
pub static TOGGLE_ADD_ONS: &[ToggleAddOn] = &[
    toggle("auto_nickname", "Auto Nickname Case"),
    toggle("hidden_abilities", "Hidden Abilities"),
    toggle("modern_stats", "Modern Stats"),
    toggle("berries_no_longer_disappear", "Berries No Longer Disappear"),
    toggle("no_dark_caves", "No Dark Caves"),
    toggle("recapitalize_names", "Recapitalize Names"),
    toggle("disable_random_pokenav_calls", "Disable Random Pokenav Calls"),
    toggle("lore_friendly_evolutions", "Lore-Friendly Evolutions"),
    toggle("move_faster_underwater", "Move Faster Underwater"),
    toggle("disable_bike_music", "Disable Bike Music"),
    toggle("poison_update", "Poison Update"),
    toggle("prng_fix", "PRNGFix"),
    toggle("no_fleeing_safari", "No Fleeing Pokemon in Safari Zone"),
    ToggleAddOn {
        key: "gen4_lite_movesets",
        label: "Gen IV Lite Movesets",
        priority: 0,
        requirement: Requirement::Base(Base::Legacy),
    },
];

/// Add-on patched in for exp share on bases that have no dedicated build.
pub static EXP_SHARE: ToggleAddOn = toggle("exp_share", "Gen VI Exp Share");

pub fn find_selectable(key: &str) -> Option<&'static SelectableAddOn> {
    let key = normalize(key);
    SELECTABLE_ADD_ONS.iter().find(|a| a.key == key)
}

pub fn find_toggle(key: &str) -> Option<&'static ToggleAddOn> {
    let key = normalize(key);
    TOGGLE_ADD_ONS.iter().find(|a| a.key == key)
}

/// Everything the user picked for one patch run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatchOptions {
    pub base: Base,
    pub variant: Variant,
    pub exp_share: bool,
    toggles: BTreeSet<&'static str>,
    selections: BTreeMap<&'static str, &'static Choice>,
}

impl PatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, base: Base) -> Self {
        self.base = base;
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_exp_share(mut self, exp_share: bool) -> Self {
        self.exp_share = exp_share;
        self
    }

    /// Builder form of [`enable`](Self::enable).
    pub fn with_toggle(mut self, key: &str) -> Result<Self, OrchestratorError> {
        self.enable(key)?;
        Ok(self)
    }

    /// Builder form of [`select`](Self::select).
    pub fn with_selection(mut self, option: &str, value: &str) -> Result<Self, OrchestratorError> {
        self.select(option, value)?;
        Ok(self)
    }

    /// Turn a toggle add-on on.
    pub fn enable(&mut self, key: &str) -> Result<(), OrchestratorError> {
        let addon =
            find_toggle(key).ok_or_else(|| OrchestratorError::UnknownOption(key.to_string()))?;
        self.toggles.insert(addon.key);
        Ok(())
    }

    pub fn disable(&mut self, key: &str) {
        if let Some(addon) = find_toggle(key) {
            self.toggles.remove(addon.key);
        }
    }

    pub fn is_enabled(&self, key: &str) -> bool {
        find_toggle(key).is_some_and(|a| self.toggles.contains(a.key))
    }

    /// Pick a choice for a selectable add-on.
    ///
    /// Picking the default choice clears the selection.
    pub fn select(&mut self, option: &str, value: &str) -> Result<(), OrchestratorError> {
        let addon = find_selectable(option)
            .ok_or_else(|| OrchestratorError::UnknownOption(option.to_string()))?;
        let choice = addon
            .choice(value)
            .ok_or_else(|| OrchestratorError::UnknownChoice {
                option: addon.key.to_string(),
                value: value.to_string(),
            })?;

        if choice.key == addon.default_choice().key {
            self.selections.remove(addon.key);
        } else {
            self.selections.insert(addon.key, choice);
        }
        Ok(())
    }

    /// Current choice of a selectable add-on, if it exists.
    pub fn selection(&self, option: &str) -> Option<&'static Choice> {
        let addon = find_selectable(option)?;
        Some(
            self.selections
                .get(addon.key)
                .copied()
                .unwrap_or_else(|| addon.default_choice()),
        )
    }

    /// Enabled toggles in discovery order.
    pub fn enabled_toggles(&self) -> impl Iterator<Item = &'static ToggleAddOn> + '_ {
        TOGGLE_ADD_ONS
            .iter()
            .filter(move |a| self.toggles.contains(a.key))
    }

    /// Selectables with a non-default choice, in discovery order.
    pub fn active_selections(
        &self,
    ) -> impl Iterator<Item = (&'static SelectableAddOn, &'static Choice)> + '_ {
        SELECTABLE_ADD_ONS
            .iter()
            .filter_map(move |a| self.selections.get(a.key).map(|c| (a, *c)))
    }

    /// Check every enabled add-on's requirement.
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        for addon in self.enabled_toggles() {
            if !addon.requirement.holds(self) {
                return Err(OrchestratorError::InvalidSelection {
                    option: addon.key.to_string(),
                    reason: addon.requirement.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Lowercase and fold `-` and spaces into `_`.
fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}
