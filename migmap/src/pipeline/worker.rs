//! Per-principal processing.

use std::collections::HashMap;
use std::time::Instant;

use crate::cache::{CacheKey, CacheStore};
use crate::error::Result;
use crate::item::{LiveItem, MatchedItem};
use crate::output::OutputSink;
use crate::path::PathResolver;
use crate::reconcile::{LogEntry, ReconciliationIndex};
use crate::source::LiveItemSource;

/// Collaborators shared by every worker.
pub(super) struct Context<'a> {
    pub index: &'a ReconciliationIndex,
    pub source: &'a dyn LiveItemSource,
    pub cache: &'a dyn CacheStore,
    pub sink: &'a dyn OutputSink,
    pub fingerprint: &'a str,
}

/// Result of one successfully processed principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct PrincipalReport {
    pub matched_items: usize,
    pub cache_hit: bool,
}

impl<'a> Context<'a> {
    /// Fetches, resolves, matches and emits one principal's items.
    pub(super) fn process(&self, principal: &str, label: &str) -> Result<PrincipalReport> {
        let started = Instant::now();
        let (items, cache_hit) = self.fetch(principal, label)?;

        let paths = PathResolver::new().resolve(&items)?;
        let (matched, claimed) = self.match_items(principal, &items, &paths);

        if let Err(e) = self.sink.append_matched_items(&matched) {
            // Nothing was written, so the rows stay unmatched.
            for entry in claimed {
                entry.release();
            }
            return Err(e);
        }

        log::info!(
            "Processed {label} in {}ms: {} items, {} paths, {} matched",
            started.elapsed().as_millis(),
            items.len(),
            paths.path_count(),
            matched.len()
        );

        Ok(PrincipalReport {
            matched_items: matched.len(),
            cache_hit,
        })
    }

    fn fetch(&self, principal: &str, label: &str) -> Result<(Vec<LiveItem>, bool)> {
        let key = CacheKey::new(principal, self.fingerprint);

        match self.cache.get(&key) {
            Ok(Some(items)) => {
                log::debug!("cache hit for {label}: {} items", items.len());
                return Ok((items, true));
            }
            Ok(None) => log::debug!("cache miss for {label}"),
            Err(e) => log::warn!("cache read failed for {label}: {e}"),
        }

        let started = Instant::now();
        let items = self.source.list_items(principal, label)?;
        log::debug!(
            "listed {} items for {label} in {}ms",
            items.len(),
            started.elapsed().as_millis()
        );

        if let Err(e) = self.cache.put(&key, &items) {
            log::warn!("cache write failed for {label}: {e}");
        }

        Ok((items, false))
    }

    fn match_items(
        &self,
        principal: &str,
        items: &[LiveItem],
        paths: &crate::path::ResolvedPaths,
    ) -> (Vec<MatchedItem>, Vec<&'a LogEntry>) {
        // Only the last record of a duplicated identifier takes part.
        let last_seen: HashMap<&str, usize> = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id.as_str(), i))
            .collect();

        let mut matched = Vec::new();
        let mut claimed = Vec::new();
        for (i, item) in items.iter().enumerate() {
            if last_seen.get(item.id.as_str()) != Some(&i) {
                continue;
            }
            let destination_type = item.kind.destination_type();
            for path in paths.get(&item.id) {
                let Some(claim) = self
                    .index
                    .match_item(principal, destination_type, path, &item.name)
                else {
                    continue;
                };
                if claim.copy_number > 0 || claim.slash_substituted {
                    log::debug!(
                        "matched {path} to row {} (copy number {}, slash substituted: {})",
                        claim.entry.row(),
                        claim.copy_number,
                        claim.slash_substituted
                    );
                }
                claimed.push(claim.entry);
                matched.push(MatchedItem {
                    item: item.clone(),
                    path: path.clone(),
                    destination_location: claim.entry.destination_location().to_string(),
                    destination_type: claim.entry.destination_type().to_string(),
                    destination_path: claim.entry.destination_path().to_string(),
                });
            }
        }
        (matched, claimed)
    }
}
