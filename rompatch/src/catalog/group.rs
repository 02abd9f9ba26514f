//! Patch groups: the populated view of one catalog version.

use std::collections::BTreeMap;
use std::fmt;

use super::error::CatalogError;
use super::tree::{build_tree, CatalogNode};
use crate::format::PatchMethod;
use crate::version::{sorted_versions, Version};

/// Location of a file inside one catalog version, as path segments.
///
/// The version directory itself is not part of the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CatalogPath {
    segments: Vec<String>,
}

impl CatalogPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// A new path with `name` appended.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }
}

impl fmt::Display for CatalogPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// A patch file known to the catalog but not yet fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRef {
    pub path: CatalogPath,
    pub method: PatchMethod,
}

/// One named node of a [`PatchGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatchEntry {
    /// Patch file for leaf entries.
    pub patch: Option<PatchRef>,
    /// Lower priorities are applied first.
    pub priority: i32,
    pub children: PatchGroup,
    /// Readme found directly inside a directory entry.
    pub readme: Option<CatalogPath>,
}

impl PatchEntry {
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn is_directory(&self) -> bool {
        self.patch.is_none()
    }
}

/// Named, possibly nested collection of patch entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatchGroup {
    entries: BTreeMap<String, PatchEntry>,
}

impl PatchGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate a group from the children of one tree node.
    ///
    /// Directories become entries with children. Files with a known patch
    /// extension become leaf entries. A readme inside a directory attaches
    /// to that directory's entry; any other file is skipped.
    pub fn from_nodes(prefix: &CatalogPath, nodes: &BTreeMap<String, CatalogNode>) -> Self {
        let mut group = PatchGroup::new();

        for (name, node) in nodes {
            let path = prefix.child(name.as_str());

            if !node.is_leaf() {
                let readme = node
                    .children
                    .iter()
                    .filter(|(_, child)| child.is_leaf())
                    .find(|(child_name, _)| is_readme(child_name))
                    .map(|(child_name, _)| path.child(child_name.as_str()));

                group.insert(
                    name.clone(),
                    PatchEntry {
                        children: PatchGroup::from_nodes(&path, &node.children),
                        readme,
                        ..Default::default()
                    },
                );
            } else if let Some(method) = PatchMethod::from_file_name(name) {
                group.insert(
                    name.clone(),
                    PatchEntry {
                        patch: Some(PatchRef { path, method }),
                        ..Default::default()
                    },
                );
            }
        }

        group
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: PatchEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry keys in lexical order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatchEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Direct child entry.
    pub fn entry(&self, key: &str) -> Option<&PatchEntry> {
        self.entries.get(key)
    }

    /// Follow `path` through nested entries.
    ///
    /// An empty path has no entry and returns `None`.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&PatchEntry> {
        let (first, rest) = path.split_first()?;
        let mut entry = self.entry(first.as_ref())?;
        for segment in rest {
            entry = entry.children.entry(segment.as_ref())?;
        }
        Some(entry)
    }

    /// Every patch below `prefix`, in application order.
    ///
    /// An entry's own patch comes before its children, and siblings are
    /// ordered by `(priority, key)`. An empty prefix walks the whole group; a
    /// prefix that does not exist yields nothing.
    pub fn collect<S: AsRef<str>>(&self, prefix: &[S]) -> Vec<&PatchRef> {
        let mut out = Vec::new();
        if prefix.is_empty() {
            self.collect_into(&mut out);
        } else if let Some(entry) = self.get(prefix) {
            collect_entry(entry, &mut out);
        }
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a PatchRef>) {
        for (_, entry) in self.sorted_entries() {
            collect_entry(entry, out);
        }
    }

    /// Entries sorted by `(priority, key)`.
    pub fn sorted_entries(&self) -> Vec<(&str, &PatchEntry)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|(ka, a), (kb, b)| a.priority.cmp(&b.priority).then_with(|| ka.cmp(kb)));
        entries
    }
}

fn collect_entry<'a>(entry: &'a PatchEntry, out: &mut Vec<&'a PatchRef>) {
    if let Some(patch) = &entry.patch {
        out.push(patch);
    }
    entry.children.collect_into(out);
}

fn is_readme(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower == "readme.txt" || lower.ends_with(".md")
}

/// Patch groups keyed by version directory name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionGroup {
    groups: BTreeMap<String, PatchGroup>,
}

impl VersionGroup {
    /// Rebuild the version groups from a flat, parent-before-child listing.
    ///
    /// Top-level names without a version number are dropped.
    pub fn from_paths<I, S>(paths: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::from_tree(&build_tree(paths)?))
    }

    pub fn from_tree(roots: &BTreeMap<String, CatalogNode>) -> Self {
        let groups = roots
            .iter()
            .filter(|(name, _)| Version::parse(name).is_some())
            .map(|(name, node)| {
                (
                    name.clone(),
                    PatchGroup::from_nodes(&CatalogPath::default(), &node.children),
                )
            })
            .collect();

        Self { groups }
    }

    pub fn get(&self, version: &str) -> Option<&PatchGroup> {
        self.groups.get(version)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Version keys, newest first.
    pub fn versions(&self) -> Vec<&str> {
        sorted_versions(self.groups.keys().map(String::as_str))
            .into_iter()
            .map(|(_, name)| name)
            .collect()
    }

    /// The newest version key.
    pub fn newest(&self) -> Option<&str> {
        self.versions().into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VersionGroup {
        VersionGroup::from_paths([
            "7.4",
            "7.4/a.ips",
            "7.4/sub",
            "7.4/sub/b.ips",
            "7.4/sub/readme.txt",
            "8.0",
            "8.0/c.ips",
        ])
        .unwrap()
    }

    #[test]
    fn test_version_groups_from_paths() {
        let groups = sample();
        assert_eq!(groups.len(), 2);

        let v74 = groups.get("7.4").unwrap();
        let sub = v74.entry("sub").unwrap();
        assert!(sub.is_directory());
        let b = sub.children.entry("b.ips").unwrap();
        assert_eq!(
            b.patch.as_ref().unwrap().path,
            CatalogPath::new(["sub", "b.ips"])
        );
        assert_eq!(b.patch.as_ref().unwrap().method, PatchMethod::Ips);

        assert!(groups.get("8.0").unwrap().entry("c.ips").is_some());
    }

    #[test]
    fn test_non_version_roots_are_dropped() {
        let groups =
            VersionGroup::from_paths(["README.md", "docs", "docs/x.ips", "7.4", "7.4/a.ips"])
                .unwrap();
        assert_eq!(groups.versions(), vec!["7.4"]);
    }

    #[test]
    fn test_readme_attaches_to_directory() {
        let groups = sample();
        let sub = groups.get("7.4").unwrap().entry("sub").unwrap();
        assert_eq!(sub.readme, Some(CatalogPath::new(["sub", "readme.txt"])));
        assert!(sub.children.entry("readme.txt").is_none());
    }

    #[test]
    fn test_unknown_files_are_skipped() {
        let groups = VersionGroup::from_paths(["1.0", "1.0/notes.txt", "1.0/a.IPS"]).unwrap();
        let group = groups.get("1.0").unwrap();
        assert_eq!(group.keys().collect::<Vec<_>>(), vec!["a.IPS"]);
    }

    #[test]
    fn test_unknown_parent_propagates() {
        let result = VersionGroup::from_paths(["7.4/sub/b.ips"]);
        assert!(matches!(result, Err(CatalogError::UnknownParent { .. })));
    }

    #[test]
    fn test_versions_newest_first() {
        let groups = VersionGroup::from_paths(["9.9", "10.2", "10.10", "v1.0"]).unwrap();
        assert_eq!(groups.versions(), vec!["10.10", "10.2", "9.9", "v1.0"]);
        assert_eq!(groups.newest(), Some("10.10"));
        assert_eq!(VersionGroup::default().newest(), None);
    }

    #[test]
    fn test_get_nested_path() {
        let groups = sample();
        let v74 = groups.get("7.4").unwrap();
        assert!(v74.get(&["sub", "b.ips"]).is_some());
        assert!(v74.get(&["sub", "missing.ips"]).is_none());
        assert!(v74.get::<&str>(&[]).is_none());
    }

    #[test]
    fn test_collect_orders_by_priority_then_key() {
        let mut children = PatchGroup::new();
        children.insert(
            "z.ips",
            PatchEntry {
                patch: Some(PatchRef {
                    path: CatalogPath::new(["dir", "z.ips"]),
                    method: PatchMethod::Ips,
                }),
                ..Default::default()
            }
            .with_priority(-1),
        );
        children.insert(
            "a.ips",
            PatchEntry {
                patch: Some(PatchRef {
                    path: CatalogPath::new(["dir", "a.ips"]),
                    method: PatchMethod::Ips,
                }),
                ..Default::default()
            },
        );

        let mut group = PatchGroup::new();
        group.insert(
            "dir",
            PatchEntry {
                patch: Some(PatchRef {
                    path: CatalogPath::new(["dir.ips"]),
                    method: PatchMethod::Ips,
                }),
                children,
                ..Default::default()
            },
        );
        group.insert(
            "base.ips",
            PatchEntry {
                patch: Some(PatchRef {
                    path: CatalogPath::new(["base.ips"]),
                    method: PatchMethod::Ips,
                }),
                ..Default::default()
            }
            .with_priority(5),
        );

        let order: Vec<String> = group
            .collect::<&str>(&[])
            .iter()
            .map(|p| p.path.to_string())
            .collect();
        assert_eq!(order, vec!["dir.ips", "dir/z.ips", "dir/a.ips", "base.ips"]);

        let order: Vec<String> = group
            .collect(&["dir"])
            .iter()
            .map(|p| p.path.to_string())
            .collect();
        assert_eq!(order, vec!["dir.ips", "dir/z.ips", "dir/a.ips"]);

        assert!(group.collect(&["nope"]).is_empty());
    }
}
