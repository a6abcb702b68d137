//! Core types for path resolution.

use std::collections::HashMap;

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// The full paths computed for every item of one principal's listing.
///
/// Paths are slash-delimited strings from a root to the item, one per
/// root-to-item traversal of the parent graph.
///
/// # Examples
///
/// ```
/// use migmap::path::ResolvedPaths;
///
/// let mut paths = ResolvedPaths::default();
/// paths.insert("f1".to_string(), vec!["/Docs/f.txt".to_string()]);
/// assert_eq!(paths.get("f1"), &["/Docs/f.txt".to_string()]);
/// assert!(paths.get("missing").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPaths {
    by_id: HashMap<String, Vec<String>>,
}

impl ResolvedPaths {
    /// Records the paths of one item.
    pub fn insert(&mut self, id: String, paths: Vec<String>) {
        self.by_id.insert(id, paths);
    }

    /// Paths of an item, empty if the item was never enumerated.
    #[must_use]
    pub fn get(&self, id: &str) -> &[String] {
        self.by_id.get(id).map_or(&[], Vec::as_slice)
    }

    /// Number of items with resolved paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether no item was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Total number of paths across all items.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.by_id.values().map(Vec::len).sum()
    }
}

/// Appends one segment to a parent path.
///
/// # Examples
///
/// ```
/// use migmap::path::join_segment;
///
/// assert_eq!(join_segment("", "Docs"), "/Docs");
/// assert_eq!(join_segment("/Docs", "f.txt"), "/Docs/f.txt");
/// ```
#[must_use]
pub fn join_segment(parent: &str, name: &str) -> String {
    let mut path = String::with_capacity(parent.len() + name.len() + 1);
    path.push_str(parent);
    path.push(SEPARATOR);
    path.push_str(name);
    path
}
