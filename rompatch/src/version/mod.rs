//! Two-part version identifiers for catalog directories.
//!
//! Catalog directories are named after patch releases (`7.4`, `7.4.1`,
//! `v8.0-beta`). Only the first `<int>.<int>` pair in a name is significant;
//! anything after it is ignored when ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Error returned when a string contains no `<int>.<int>` pair.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no version number in '{0}'")]
pub struct VersionParseError(pub String);

/// A `major.minor` version, ordered by major then minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

/// Matches the first `<int>.<int>` pair.
///
/// ASCII digits only; `\d` would also accept other Unicode digits that
/// `u32::from_str` rejects.
fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([0-9]+)\.([0-9]+)").unwrap())
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Find the first `<int>.<int>` pair in `text`.
    ///
    /// Returns `None` when there is no such pair or when a component does
    /// not fit in a `u32`.
    ///
    /// ```
    /// use rompatch::version::Version;
    ///
    /// assert_eq!(Version::parse("7.4.1"), Some(Version::new(7, 4)));
    /// assert_eq!(Version::parse("Emerald v10.2 final"), Some(Version::new(10, 2)));
    /// assert_eq!(Version::parse("latest"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let captures = version_pattern().captures(text)?;
        let major = captures.get(1)?.as_str().parse().ok()?;
        let minor = captures.get(2)?.as_str().parse().ok()?;
        Some(Self { major, minor })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s).ok_or_else(|| VersionParseError(s.to_string()))
    }
}

/// Parse `names`, drop the ones without a version, and sort newest first.
///
/// Each result keeps the original name next to its parsed version, so
/// callers can still address the catalog directory it came from. Names that
/// parse to the same version keep their input order.
pub fn sorted_versions<'a, I>(names: I) -> Vec<(Version, &'a str)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut versions: Vec<(Version, &str)> = names
        .into_iter()
        .filter_map(|name| Version::parse(name).map(|v| (v, name)))
        .collect();
    versions.sort_by(|a, b| b.0.cmp(&a.0));
    versions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(Version::parse("7.4"), Some(Version::new(7, 4)));
        assert_eq!(Version::parse("0.0"), Some(Version::new(0, 0)));
    }

    #[test]
    fn test_parse_takes_first_pair() {
        assert_eq!(Version::parse("7.4.1"), Some(Version::new(7, 4)));
        assert_eq!(Version::parse("v1.2 then 3.4"), Some(Version::new(1, 2)));
    }

    #[test]
    fn test_parse_rejects_non_versions() {
        assert_eq!(Version::parse(""), None);
        assert_eq!(Version::parse("7"), None);
        assert_eq!(Version::parse("7."), None);
        assert_eq!(Version::parse(".4"), None);
        assert_eq!(Version::parse("Legacy Variant"), None);
    }

    #[test]
    fn test_parse_overflow() {
        assert_eq!(Version::parse("99999999999.1"), None);
    }

    #[test]
    fn test_major_dominates_minor() {
        let newer = Version::parse("10.2").unwrap();
        let older = Version::parse("9.9").unwrap();
        assert_eq!(newer.cmp(&older), Ordering::Greater);
        assert!(newer > older);
    }

    #[test]
    fn test_minor_breaks_ties() {
        assert!(Version::new(7, 10) > Version::new(7, 4));
        assert_eq!(Version::new(7, 4).cmp(&Version::new(7, 4)), Ordering::Equal);
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::new(7, 4).to_string(), "7.4");
        assert_eq!(Version::parse("v07.04").unwrap().to_string(), "7.4");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("8.0".parse::<Version>(), Ok(Version::new(8, 0)));
        let err = "main".parse::<Version>().unwrap_err();
        assert_eq!(err.to_string(), "no version number in 'main'");
    }

    #[test]
    fn test_sorted_versions_newest_first() {
        let names = ["7.4", "docs", "10.0", "8.1", "7.10"];
        let sorted = sorted_versions(names.iter().copied());
        let order: Vec<&str> = sorted.iter().map(|(_, name)| *name).collect();
        assert_eq!(order, vec!["10.0", "8.1", "7.10", "7.4"]);
    }

    #[test]
    fn test_sorted_versions_empty() {
        assert!(sorted_versions(["README.md"].iter().copied()).is_empty());
    }
}
