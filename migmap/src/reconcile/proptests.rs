//! Property-based tests for copy-number candidates and key normalization.

use super::copy_number::{parse_copy_number, with_copy_number};
use super::key::{normalize_full_path, ReconciliationKey};
use proptest::prelude::*;

fn path_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec("[A-Za-z0-9 ]{1,8}", 0..3),
        "[A-Za-z0-9_-]{1,10}",
        prop::option::of("[a-z0-9]{1,4}"),
    )
        .prop_map(|(folders, stem, ext)| {
            let mut path = String::new();
            for folder in folders {
                path.push('/');
                path.push_str(&folder);
            }
            path.push('/');
            path.push_str(&stem);
            if let Some(ext) = ext {
                path.push('.');
                path.push_str(&ext);
            }
            path
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Copy number zero leaves the path alone
    #[test]
    fn copy_number_zero_is_identity(path in path_strategy()) {
        prop_assert_eq!(with_copy_number(&path, 0), path);
    }

    // Parsing recovers the inserted copy number
    #[test]
    fn parse_recovers_copy_number(path in path_strategy(), n in 1u32..=5000) {
        prop_assert_eq!(parse_copy_number(&with_copy_number(&path, n)), Some(n));
    }

    // Distinct copy numbers never produce the same candidate
    #[test]
    fn candidates_are_distinct(path in path_strategy(), a in 0u32..=999, b in 0u32..=999) {
        prop_assume!(a != b);
        prop_assert_ne!(with_copy_number(&path, a), with_copy_number(&path, b));
    }

    // Only the last segment changes
    #[test]
    fn copy_number_keeps_parent(path in path_strategy(), n in 1u32..=999) {
        let candidate = with_copy_number(&path, n);
        let parent = &path[..path.rfind('/').unwrap_or(0)];
        prop_assert!(candidate.starts_with(parent));
    }

    // Normalization is idempotent and key construction applies it
    #[test]
    fn normalization_idempotent(path in path_strategy()) {
        let once = normalize_full_path(&path);
        prop_assert_eq!(normalize_full_path(&once), once.clone());
        let key = ReconciliationKey::new("p@x.com", "file", &path);
        prop_assert_eq!(key.full_path(), once.as_str());
    }
}
