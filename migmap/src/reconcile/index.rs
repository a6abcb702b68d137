//! The reconciliation index and its claim protocol.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};

use crate::path::SEPARATOR;
use crate::reconcile::copy_number::{parse_copy_number, with_copy_number};
use crate::reconcile::entry::LogEntry;
use crate::reconcile::key::ReconciliationKey;
use crate::reconcile::report::{CharacterStats, UnmatchedReport, UnmatchedRow};

/// Default upper bound on copy numbers tried during matching.
pub const DEFAULT_MAX_COPY_NUMBER: u32 = 999;

/// Tunables for a [`ReconciliationIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOptions {
    /// Highest copy number tried before giving up on a live path.
    pub max_copy_number: u32,
    /// Destination path of the migration root, if known.
    pub root_destination_path: Option<String>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            max_copy_number: DEFAULT_MAX_COPY_NUMBER,
            root_destination_path: None,
        }
    }
}

/// Two rows that produced the same key with different destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// The shared key.
    pub key: ReconciliationKey,
    /// Row that stays in the index.
    pub kept_row: usize,
    /// Row that was overwritten.
    pub discarded_row: usize,
}

/// A successful match of a live path against the index.
#[derive(Debug, Clone, Copy)]
pub struct Claim<'a> {
    /// The claimed entry.
    pub entry: &'a LogEntry,
    /// Copy number that produced the hit, zero for the path itself.
    pub copy_number: u32,
    /// Whether slashes in the item name had to be replaced by underscores.
    pub slash_substituted: bool,
}

/// Every migration log entry keyed by principal, type and path.
///
/// The index is built once, before any live enumeration starts, and then
/// shared read-only between workers. Only the per-entry usage counters and
/// the live character inventory change afterwards.
#[derive(Debug)]
pub struct ReconciliationIndex {
    entries: HashMap<ReconciliationKey, LogEntry>,
    principals: Vec<String>,
    total_rows: usize,
    collisions: Vec<Collision>,
    unrecognized_types: BTreeMap<String, usize>,
    log_chars: BTreeSet<char>,
    live_chars: Mutex<BTreeSet<char>>,
    options: IndexOptions,
}

impl ReconciliationIndex {
    /// Indexes `entries` in log order.
    ///
    /// When two entries share a key the later one wins. If their
    /// destinations differ the pair is recorded as a [`Collision`].
    pub fn build(entries: impl IntoIterator<Item = LogEntry>, options: IndexOptions) -> Self {
        let mut index = Self {
            entries: HashMap::new(),
            principals: Vec::new(),
            total_rows: 0,
            collisions: Vec::new(),
            unrecognized_types: BTreeMap::new(),
            log_chars: BTreeSet::new(),
            live_chars: Mutex::new(BTreeSet::new()),
            options,
        };
        let mut seen_principals = BTreeSet::new();

        for entry in entries {
            index.total_rows += 1;
            index.log_chars.extend(entry.full_path().chars());

            if seen_principals.insert(entry.principal().to_string()) {
                index.principals.push(entry.principal().to_string());
            }
            if !entry.has_recognized_type() {
                *index
                    .unrecognized_types
                    .entry(entry.destination_type().to_string())
                    .or_default() += 1;
            }

            let key = ReconciliationKey::new(
                entry.principal(),
                entry.destination_type(),
                entry.full_path(),
            );
            let row = entry.row();
            if let Some(previous) = index.entries.insert(key.clone(), entry) {
                let differs = index
                    .entries
                    .get(&key)
                    .is_some_and(|current| !current.same_destination(&previous));
                if differs {
                    log::info!(
                        "collision on {key}: keeping row {row}, discarding row {} ({})",
                        previous.row(),
                        previous.full_path()
                    );
                    index.collisions.push(Collision {
                        key,
                        kept_row: row,
                        discarded_row: previous.row(),
                    });
                } else {
                    log::debug!("duplicate row {row} for {key}");
                }
            }
        }

        for (kind, count) in &index.unrecognized_types {
            log::warn!("{count} log rows have unrecognized destination type '{kind}'");
        }
        if !index.collisions.is_empty() {
            log::warn!(
                "{} log rows were discarded by key collisions",
                index.collisions.len()
            );
        }

        index
    }

    /// Number of rows indexed, including collisions and duplicates.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct principals in first-seen log order.
    #[must_use]
    pub fn principals(&self) -> &[String] {
        &self.principals
    }

    /// Key collisions recorded during the build.
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Counts of rows per unrecognized destination type.
    #[must_use]
    pub fn unrecognized_types(&self) -> &BTreeMap<String, usize> {
        &self.unrecognized_types
    }

    /// Looks up an entry without claiming it.
    #[must_use]
    pub fn get(&self, key: &ReconciliationKey) -> Option<&LogEntry> {
        self.entries.get(key)
    }

    /// Iterates over all entries in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.values()
    }

    /// Number of entries claimed at least once.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.entries.values().filter(|e| e.usage() > 0).count()
    }

    /// Matches one live path and claims the entry it resolves to.
    ///
    /// Candidates are the path itself followed by its copy-number variants.
    /// The first unclaimed candidate is claimed; a claimed one sends the
    /// search to the next copy number; a missing one ends it. If the search
    /// fails and `file_name` contains a slash, one more direct lookup is made
    /// with slashes in the name replaced by underscores.
    pub fn match_item(
        &self,
        principal: &str,
        destination_type: &str,
        full_path: &str,
        file_name: &str,
    ) -> Option<Claim<'_>> {
        self.record_live_chars(file_name);

        if let Some(claim) = self.claim_first_free(principal, destination_type, full_path) {
            return Some(claim);
        }

        if !file_name.contains(SEPARATOR) {
            return None;
        }
        let parent = full_path.strip_suffix(file_name)?;
        let substituted = format!("{parent}{}", file_name.replace(SEPARATOR, "_"));
        let key = ReconciliationKey::new(principal, destination_type, &substituted);
        let entry = self.entries.get(&key)?;
        (!self.is_likely_root_folder(entry) && entry.try_claim()).then_some(Claim {
            entry,
            copy_number: 0,
            slash_substituted: true,
        })
    }

    fn claim_first_free(
        &self,
        principal: &str,
        destination_type: &str,
        full_path: &str,
    ) -> Option<Claim<'_>> {
        for copy_number in 0..=self.options.max_copy_number {
            let candidate = with_copy_number(full_path, copy_number);
            let key = ReconciliationKey::new(principal, destination_type, &candidate);
            let entry = self.entries.get(&key)?;
            if self.is_likely_root_folder(entry) {
                return None;
            }
            if entry.try_claim() {
                return Some(Claim {
                    entry,
                    copy_number,
                    slash_substituted: false,
                });
            }
        }
        None
    }

    fn record_live_chars(&self, file_name: &str) {
        let chars: BTreeSet<char> = file_name.chars().collect();
        self.live_chars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(chars);
    }

    /// Whether `entry` looks like the migration root folder itself.
    ///
    /// Such rows are never claimed and never reported as unmatched.
    #[must_use]
    pub fn is_likely_root_folder(&self, entry: &LogEntry) -> bool {
        match &self.options.root_destination_path {
            Some(root) if !root.is_empty() => {
                entry.destination_type() == "folder" && entry.destination_location().ends_with(root.as_str())
            }
            _ => false,
        }
    }

    /// Entries never claimed, with per-attribute breakdowns.
    #[must_use]
    pub fn unmatched_entries(&self) -> UnmatchedReport {
        let mut report = UnmatchedReport::default();
        let mut unmatched: Vec<&LogEntry> = Vec::new();

        for entry in self.entries.values().filter(|e| e.usage() == 0) {
            if self.is_likely_root_folder(entry) {
                report.suppressed_root_folders += 1;
            } else {
                unmatched.push(entry);
            }
        }
        unmatched.sort_by_key(|e| e.row());

        for entry in unmatched {
            *report
                .by_source_extension
                .entry(entry.source_extension().to_string())
                .or_default() += 1;
            *report
                .by_destination_extension
                .entry(entry.destination_extension().to_string())
                .or_default() += 1;
            *report
                .by_destination_type
                .entry(entry.destination_type().to_string())
                .or_default() += 1;
            for c in entry.full_path().chars().filter(|&c| c != SEPARATOR) {
                *report.by_character.entry(c).or_default() += 1;
            }
            if let Some(n) = parse_copy_number(entry.full_path()) {
                *report.by_copy_number.entry(n).or_default() += 1;
            }
            report.rows.push(UnmatchedRow::from(entry));
        }

        report
    }

    /// Count of entries per usage value.
    #[must_use]
    pub fn usage_histogram(&self) -> BTreeMap<u32, usize> {
        let mut histogram = BTreeMap::new();
        for entry in self.entries.values() {
            *histogram.entry(entry.usage()).or_default() += 1;
        }
        histogram
    }

    /// Characters seen in live item names but never in log paths.
    #[must_use]
    pub fn character_stats(&self) -> CharacterStats {
        let live = self
            .live_chars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        CharacterStats {
            log_chars: self.log_chars.len(),
            live_chars: live.len(),
            live_only: live.difference(&self.log_chars).copied().collect(),
        }
    }
}
