//! Multi-parent path resolution.
//!
//! This module provides the `PathResolver` type, which turns a flat drive
//! listing into full paths. Items may have several parents, so one item can
//! own several paths; shared ancestors are resolved once and reused.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::item::LiveItem;
use crate::path::types::{join_segment, ResolvedPaths};

/// Resolution state of one node in the lookup table.
#[derive(Debug)]
enum NodeState {
    Pending,
    Resolving,
    Done(Vec<String>),
}

#[derive(Debug)]
struct Node<'a> {
    name: &'a str,
    parents: &'a [String],
    state: NodeState,
}

/// Arena of nodes for one principal, indexed by item identifier.
///
/// Built once per resolution pass and dropped when it completes.
struct Table<'a> {
    nodes: Vec<Node<'a>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> Table<'a> {
    fn build(items: &'a [LiveItem]) -> Self {
        let mut nodes = Vec::with_capacity(items.len());
        let mut index = HashMap::with_capacity(items.len());

        for item in items {
            let node = Node {
                name: &item.name,
                parents: &item.parents,
                state: NodeState::Pending,
            };
            // Later duplicates of an identifier replace earlier ones.
            if let Some(&slot) = index.get(item.id.as_str()) {
                nodes[slot] = node;
            } else {
                index.insert(item.id.as_str(), nodes.len());
                nodes.push(node);
            }
        }

        Self { nodes, index }
    }

    /// Paths of a parent that is already resolved or absent from the table.
    fn parent_paths(&self, parent_id: &str) -> &[String] {
        const UNKNOWN: &[String] = &[String::new()];
        match self.index.get(parent_id) {
            Some(&slot) => match &self.nodes[slot].state {
                NodeState::Done(paths) => paths,
                _ => &[],
            },
            None => UNKNOWN,
        }
    }

    /// Resolves `start` and every ancestor it depends on.
    ///
    /// Uses an explicit stack so deep hierarchies cannot exhaust the call
    /// stack. A node popped for expansion while still marked `Resolving` is
    /// its own ancestor.
    fn resolve(&mut self, start: usize, id_of: &dyn Fn(usize) -> String) -> Result<()> {
        let mut stack = vec![(start, false)];

        while let Some((slot, expanded)) = stack.pop() {
            if expanded {
                let node = &self.nodes[slot];
                let paths = if node.parents.is_empty() {
                    vec![join_segment("", node.name)]
                } else {
                    node.parents
                        .iter()
                        .flat_map(|parent| {
                            self.parent_paths(parent)
                                .iter()
                                .map(|parent_path| join_segment(parent_path, node.name))
                        })
                        .collect()
                };
                self.nodes[slot].state = NodeState::Done(paths);
                continue;
            }

            match self.nodes[slot].state {
                NodeState::Done(_) => continue,
                NodeState::Resolving => {
                    return Err(Error::CycleDetected {
                        item_id: id_of(slot),
                    })
                }
                NodeState::Pending => {}
            }

            self.nodes[slot].state = NodeState::Resolving;
            stack.push((slot, true));
            for parent in self.nodes[slot].parents.iter().rev() {
                if let Some(&parent_slot) = self.index.get(parent.as_str()) {
                    if !matches!(self.nodes[parent_slot].state, NodeState::Done(_)) {
                        stack.push((parent_slot, false));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Resolves full paths for a principal's live items.
///
/// An item without parents has the single path `/<name>`. An item with
/// parents has, for each parent in order, each of that parent's paths with
/// `/<name>` appended. A parent that was never enumerated (a shared drive
/// root, for example) contributes a single empty path.
///
/// # Examples
///
/// ```
/// use migmap::{ItemKind, LiveItem};
/// use migmap::path::PathResolver;
///
/// let items = vec![
///     LiveItem::new("d1", "Docs", ItemKind::Folder, Vec::<String>::new()),
///     LiveItem::new("f1", "f.txt", ItemKind::File, ["d1"]),
/// ];
/// let paths = PathResolver::new().resolve(&items).unwrap();
/// assert_eq!(paths.get("f1"), &["/Docs/f.txt".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathResolver;

impl PathResolver {
    /// Create a new path resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolve paths for every item in `items`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] if the parent graph contains a cycle.
    pub fn resolve(&self, items: &[LiveItem]) -> Result<ResolvedPaths> {
        let mut table = Table::build(items);
        let ids: Vec<&str> = {
            let mut ids = vec![""; table.nodes.len()];
            for (id, &slot) in &table.index {
                ids[slot] = *id;
            }
            ids
        };
        let id_of = |slot: usize| ids[slot].to_string();

        for slot in 0..table.nodes.len() {
            table.resolve(slot, &id_of)?;
        }

        let mut resolved = ResolvedPaths::default();
        for (slot, node) in table.nodes.into_iter().enumerate() {
            if let NodeState::Done(paths) = node.state {
                resolved.insert(ids[slot].to_string(), paths);
            }
        }

        log::debug!(
            "resolved {} paths for {} items",
            resolved.path_count(),
            resolved.len()
        );

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;

    fn folder(id: &str, name: &str, parents: &[&str]) -> LiveItem {
        LiveItem::new(id, name, ItemKind::Folder, parents.iter().copied())
    }

    fn file(id: &str, name: &str, parents: &[&str]) -> LiveItem {
        LiveItem::new(id, name, ItemKind::File, parents.iter().copied())
    }

    #[test]
    fn test_root_item() {
        let paths = PathResolver::new().resolve(&[folder("a", "A", &[])]).unwrap();
        assert_eq!(paths.get("a"), &["/A".to_string()]);
    }

    #[test]
    fn test_nested_items() {
        let items = vec![
            folder("a", "A", &[]),
            folder("b", "B", &["a"]),
            file("c", "c.txt", &["b"]),
        ];
        let paths = PathResolver::new().resolve(&items).unwrap();
        assert_eq!(paths.get("c"), &["/A/B/c.txt".to_string()]);
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn test_child_listed_before_parent() {
        let items = vec![file("c", "c.txt", &["a"]), folder("a", "A", &[])];
        let paths = PathResolver::new().resolve(&items).unwrap();
        assert_eq!(paths.get("c"), &["/A/c.txt".to_string()]);
    }

    #[test]
    fn test_unknown_parent_contributes_empty_segment() {
        let items = vec![folder("a", "A", &["shared-drive-root"]), file("f", "f", &["a"])];
        let paths = PathResolver::new().resolve(&items).unwrap();
        assert_eq!(paths.get("a"), &["/A".to_string()]);
        assert_eq!(paths.get("f"), &["/A/f".to_string()]);
    }

    #[test]
    fn test_multiple_parents_produce_multiple_paths() {
        let items = vec![
            folder("a", "A", &[]),
            folder("b", "B", &[]),
            file("f", "f.txt", &["a", "b"]),
        ];
        let paths = PathResolver::new().resolve(&items).unwrap();
        assert_eq!(
            paths.get("f"),
            &["/A/f.txt".to_string(), "/B/f.txt".to_string()]
        );
    }

    #[test]
    fn test_parent_path_counts_are_summed() {
        // p2 has two paths of its own; f has parents p1 (1 path) and p2 (2 paths).
        let items = vec![
            folder("r1", "R1", &[]),
            folder("r2", "R2", &[]),
            folder("p1", "P1", &["r1"]),
            folder("p2", "P2", &["r1", "r2"]),
            file("f", "f", &["p1", "p2"]),
        ];
        let paths = PathResolver::new().resolve(&items).unwrap();
        assert_eq!(
            paths.get("f"),
            &[
                "/R1/P1/f".to_string(),
                "/R1/P2/f".to_string(),
                "/R2/P2/f".to_string()
            ]
        );
    }

    #[test]
    fn test_diamond_shares_ancestor() {
        let items = vec![
            folder("root", "Root", &[]),
            folder("l", "L", &["root"]),
            folder("r", "R", &["root"]),
            file("leaf", "x", &["l", "r"]),
        ];
        let paths = PathResolver::new().resolve(&items).unwrap();
        assert_eq!(paths.get("leaf").len(), 2);
        assert_eq!(paths.get("root"), &["/Root".to_string()]);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let items = vec![folder("a", "A", &["b"]), folder("b", "B", &["a"])];
        let err = PathResolver::new().resolve(&items).unwrap_err();
        assert!(err.is_cycle());
    }

    #[test]
    fn test_self_parent_is_rejected() {
        let items = vec![folder("a", "A", &["a"])];
        assert!(PathResolver::new().resolve(&items).unwrap_err().is_cycle());
    }

    #[test]
    fn test_duplicate_identifier_last_wins() {
        let items = vec![folder("a", "Old", &[]), folder("a", "New", &[])];
        let paths = PathResolver::new().resolve(&items).unwrap();
        assert_eq!(paths.get("a"), &["/New".to_string()]);
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut items = vec![folder("n0", "n0", &[])];
        for i in 1..2_000 {
            let parent = format!("n{}", i - 1);
            items.push(LiveItem::new(
                format!("n{i}"),
                format!("n{i}"),
                ItemKind::Folder,
                [parent],
            ));
        }
        items.reverse();
        let paths = PathResolver::new().resolve(&items).unwrap();
        assert!(paths.get("n1999")[0].ends_with("/n1998/n1999"));
    }

    #[test]
    fn test_empty_listing() {
        let paths = PathResolver::new().resolve(&[]).unwrap();
        assert!(paths.is_empty());
    }
}
