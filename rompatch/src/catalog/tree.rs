//! Rebuilding a directory tree from a flat path listing.

use std::collections::BTreeMap;

use super::error::CatalogError;

/// One file or directory of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogNode {
    pub name: String,
    pub children: BTreeMap<String, CatalogNode>,
}

impl CatalogNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: BTreeMap::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Rebuild the nested tree described by `paths`.
///
/// Every path is split on `/`. All segments but the last must already be in
/// the tree, so listings have to name a directory before anything inside
/// it. A path that repeats an existing node leaves that node (and whatever
/// has been attached below it) in place.
pub fn build_tree<I, S>(paths: I) -> Result<BTreeMap<String, CatalogNode>, CatalogError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut roots: BTreeMap<String, CatalogNode> = BTreeMap::new();

    for path in paths {
        let path = path.as_ref();
        let segments: Vec<&str> = path.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(CatalogError::InvalidPath {
                path: path.to_string(),
            });
        }

        let (name, parents) = match segments.split_last() {
            Some(split) => split,
            None => {
                return Err(CatalogError::InvalidPath {
                    path: path.to_string(),
                })
            }
        };

        let mut level = &mut roots;
        for parent in parents {
            level = match level.get_mut(*parent) {
                Some(node) => &mut node.children,
                None => {
                    return Err(CatalogError::UnknownParent {
                        path: path.to_string(),
                    })
                }
            };
        }

        level
            .entry(name.to_string())
            .or_insert_with(|| CatalogNode::new(*name));
    }

    Ok(roots)
}
