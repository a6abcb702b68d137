//! Property-based tests for configuration system.

use super::merger::ConfigMerger;
use super::schema::{CacheConfig, Config};
use super::validator::{ConfigValidator, MAX_CONCURRENCY};
use proptest::prelude::*;

fn cache_config_strategy() -> impl Strategy<Value = CacheConfig> {
    (
        prop::option::of(any::<bool>()),
        prop::option::of(1u64..=60_000),
    )
        .prop_map(|(enabled, busy_timeout_ms)| CacheConfig {
            enabled,
            busy_timeout_ms,
        })
}

// Small alphabet so that accumulated lists overlap often
fn known_errors_strategy() -> impl Strategy<Value = Option<Vec<String>>> {
    prop::option::of(prop::collection::vec("[a-c]{1,2}", 0..4))
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(1usize..=MAX_CONCURRENCY),
        prop::option::of(1u32..=5000),
        prop::option::of("/[A-Za-z ]{0,12}"),
        known_errors_strategy(),
        prop::option::of(cache_config_strategy()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(
            |(concurrency, max_copy_number, root, known_errors, cache, redact)| Config {
                concurrency,
                max_copy_number,
                root_destination_path: root,
                known_errors,
                cache,
                redact_principals: redact,
                ..Default::default()
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Higher precedence wins for simple fields whenever it is set
    #[test]
    fn config_merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        prop_assert_eq!(result.concurrency, high.concurrency.or(low.concurrency));
        prop_assert_eq!(result.max_copy_number, high.max_copy_number.or(low.max_copy_number));
        prop_assert_eq!(
            result.root_destination_path,
            high.root_destination_path.clone().or(low.root_destination_path.clone())
        );
        prop_assert_eq!(result.redact_principals, high.redact_principals.or(low.redact_principals));
    }

    // Empty config is identity element for merge
    #[test]
    fn config_merge_identity(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &Config::default());
        prop_assert_eq!(merged, config);
    }

    // Known errors from every layer survive the merge
    #[test]
    fn known_errors_accumulate(low in known_errors_strategy(), high in known_errors_strategy()) {
        let mut merged = Config { known_errors: low.clone(), ..Default::default() };
        ConfigMerger::merge_into(&mut merged, &Config { known_errors: high.clone(), ..Default::default() });

        let merged_errors = merged.known_errors.unwrap_or_default();
        for message in low.iter().chain(high.iter()).flatten() {
            prop_assert!(merged_errors.contains(message));
        }
        prop_assert!(merged_errors.len() <= low.map_or(0, |l| l.len()) + high.map_or(0, |h| h.len()));
    }

    // Merging is associative
    #[test]
    fn config_merge_associative(a in config_strategy(), b in config_strategy(), c in config_strategy()) {
        let mut left = a.clone();
        ConfigMerger::merge_into(&mut left, &b);
        ConfigMerger::merge_into(&mut left, &c);

        let mut b_merge_c = b;
        ConfigMerger::merge_into(&mut b_merge_c, &c);
        let mut right = a;
        ConfigMerger::merge_into(&mut right, &b_merge_c);

        prop_assert_eq!(left, right);
    }

    // Generated configs are valid, and stay valid after merging
    #[test]
    fn valid_configs_stay_valid_after_merge(a in config_strategy(), b in config_strategy()) {
        prop_assert!(ConfigValidator::validate(&a).is_ok());
        let mut merged = a;
        ConfigMerger::merge_into(&mut merged, &b);
        prop_assert!(ConfigValidator::validate(&merged).is_ok());
    }

    // Concurrency outside the accepted range is always rejected
    #[test]
    fn out_of_range_concurrency_rejected(concurrency in (MAX_CONCURRENCY + 1)..100_000usize) {
        let config = Config { concurrency: Some(concurrency), ..Default::default() };
        prop_assert!(ConfigValidator::validate(&config).is_err());
    }
}
