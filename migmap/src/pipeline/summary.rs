//! Run summaries.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::reconcile::{CharacterStats, UnmatchedReport};

/// Everything a run learned, for printing or serializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Log rows that passed validation and were indexed.
    pub total_rows: usize,
    /// Rows skipped for a wrong field count.
    pub invalid_rows: usize,
    /// Rows quarantined for missing required fields.
    pub quarantined_rows: usize,
    /// Distinct reconciliation keys.
    pub key_count: usize,
    /// Rows discarded by key collisions.
    pub collision_count: usize,
    /// Principals processed.
    pub principal_count: usize,
    /// Matched items emitted to the output.
    pub matched_items: usize,
    /// Count of entries per usage value.
    pub usage_histogram: BTreeMap<u32, usize>,
    /// Entries never claimed.
    pub unmatched: UnmatchedReport,
    /// Live-name versus log-path character inventories.
    pub character_stats: CharacterStats,
    /// Principals that failed unexpectedly.
    pub failed_principals: Vec<String>,
    /// Principals that failed with an allow-listed error.
    pub known_failure_principals: Vec<String>,
    /// Listings served from the cache.
    pub cache_hits: usize,
    /// Listings fetched from the live source.
    pub cache_misses: usize,
}

impl Summary {
    /// Whether any entry was claimed more than once.
    #[must_use]
    pub fn has_overclaimed_entries(&self) -> bool {
        self.usage_histogram.keys().any(|&usage| usage > 1)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Log rows:          {}", self.total_rows)?;
        writeln!(f, "Invalid rows:      {}", self.invalid_rows)?;
        writeln!(f, "Quarantined rows:  {}", self.quarantined_rows)?;
        writeln!(f, "Distinct keys:     {}", self.key_count)?;
        writeln!(f, "Collisions:        {}", self.collision_count)?;
        writeln!(f, "Principals:        {}", self.principal_count)?;
        writeln!(f, "Matched items:     {}", self.matched_items)?;
        writeln!(f, "Unmatched rows:    {}", self.unmatched.len())?;
        writeln!(
            f,
            "Cache:             {} hits, {} misses",
            self.cache_hits, self.cache_misses
        )?;

        let histogram: Vec<String> = self
            .usage_histogram
            .iter()
            .map(|(usage, count)| format!("{usage}={count}"))
            .collect();
        writeln!(f, "Usage histogram:   {}", histogram.join(" "))?;

        if !self.character_stats.live_only.is_empty() {
            let chars: String = self.character_stats.live_only.iter().collect();
            writeln!(f, "Live-only chars:   {chars}")?;
        }
        if !self.unmatched.by_destination_type.is_empty() {
            let types: Vec<String> = self
                .unmatched
                .by_destination_type
                .iter()
                .map(|(kind, count)| format!("{kind}={count}"))
                .collect();
            writeln!(f, "Unmatched by type: {}", types.join(" "))?;
        }
        if !self.known_failure_principals.is_empty() {
            writeln!(
                f,
                "Known failures:    {}",
                self.known_failure_principals.join(", ")
            )?;
        }
        if !self.failed_principals.is_empty() {
            writeln!(f, "Failed:            {}", self.failed_principals.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overclaim_detection() {
        let mut summary = Summary::default();
        summary.usage_histogram.insert(0, 3);
        summary.usage_histogram.insert(1, 5);
        assert!(!summary.has_overclaimed_entries());
        summary.usage_histogram.insert(2, 1);
        assert!(summary.has_overclaimed_entries());
    }

    #[test]
    fn test_display_lists_failures() {
        let summary = Summary {
            matched_items: 4,
            failed_principals: vec!["principal index 2".into()],
            ..Summary::default()
        };
        let text = summary.to_string();
        assert!(text.contains("Matched items:     4"));
        assert!(text.contains("Failed:            principal index 2"));
        assert!(!text.contains("Known failures"));
    }

    #[test]
    fn test_json_has_stable_keys() {
        let mut summary = Summary::default();
        summary.usage_histogram.insert(1, 2);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["usage_histogram"]["1"], 2);
        assert_eq!(json["cache_hits"], 0);
    }
}
