//! Property-based tests for path resolution.

use super::resolver::PathResolver;
use crate::item::{ItemKind, LiveItem};
use proptest::prelude::*;

/// Parent choices for node `i` may only point at earlier nodes, which keeps
/// the generated graph acyclic.
fn dag_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..10).prop_flat_map(|n| {
        (0..n)
            .map(|i| {
                if i == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    prop::collection::vec(0..i, 0..=2).boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

fn items_from(parents: &[Vec<usize>]) -> Vec<LiveItem> {
    parents
        .iter()
        .enumerate()
        .map(|(i, ps)| {
            LiveItem::new(
                format!("id{i}"),
                format!("n{i}"),
                ItemKind::Folder,
                ps.iter().map(|p| format!("id{p}")),
            )
        })
        .collect()
}

fn expected_count(parents: &[Vec<usize>], i: usize) -> usize {
    if parents[i].is_empty() {
        1
    } else {
        parents[i].iter().map(|&p| expected_count(parents, p)).sum()
    }
}

proptest! {
    // Path count of an item is the sum of its parents' path counts.
    #[test]
    fn path_count_is_sum_over_parents(parents in dag_strategy()) {
        let items = items_from(&parents);
        let resolved = PathResolver::new().resolve(&items).unwrap();

        for i in 0..parents.len() {
            prop_assert_eq!(resolved.get(&format!("id{i}")).len(), expected_count(&parents, i));
        }
    }

    // Every path of an item ends with its own name and starts at a root.
    #[test]
    fn paths_end_with_item_name(parents in dag_strategy()) {
        let items = items_from(&parents);
        let resolved = PathResolver::new().resolve(&items).unwrap();

        for (i, _) in parents.iter().enumerate() {
            let suffix = format!("/n{i}");
            for path in resolved.get(&format!("id{i}")) {
                prop_assert!(path.ends_with(&suffix));
                prop_assert!(path.starts_with('/'));
            }
        }
    }

    // Input order does not change the resolved paths.
    #[test]
    fn resolution_is_order_independent(parents in dag_strategy()) {
        let items = items_from(&parents);
        let mut reversed = items.clone();
        reversed.reverse();

        let forward = PathResolver::new().resolve(&items).unwrap();
        let backward = PathResolver::new().resolve(&reversed).unwrap();
        prop_assert_eq!(forward, backward);
    }

    // Pointing the root at the last node closes a cycle when the last node
    // descends from the root.
    #[test]
    fn back_edge_to_descendant_is_a_cycle(len in 2usize..8) {
        let mut parents: Vec<Vec<usize>> = (0..len).map(|i| if i == 0 { Vec::new() } else { vec![i - 1] }).collect();
        parents[0].push(len - 1);
        let items = items_from(&parents);
        prop_assert!(PathResolver::new().resolve(&items).unwrap_err().is_cycle());
    }
}
