//! The fetch, resolve and match pipeline.
//!
//! A run loads the migration log, builds the [`ReconciliationIndex`] once,
//! then processes every principal in the log on a bounded pool of worker
//! threads. Each principal is fetched from the cache or the live source,
//! resolved into paths, matched against the index and written to the sink.
//!
//! # Failure isolation
//!
//! A failing principal never aborts the run. Its error is caught at the
//! worker boundary, logged, and the principal contributes no items.
//! Provider errors whose messages are all on the known-error list are
//! logged as warnings; anything else is logged as an error.
//!
//! # Examples
//!
//! ```no_run
//! use migmap::cache::NoCache;
//! use migmap::migration_log::CsvLogLoader;
//! use migmap::output::CsvOutputSink;
//! use migmap::pipeline::{Pipeline, PipelineOptions};
//! use migmap::reconcile::IndexOptions;
//! use migmap::source::DirectorySource;
//!
//! let source = DirectorySource::new("exports");
//! let sink = CsvOutputSink::create("build-output/dataset.csv").unwrap();
//! let pipeline = Pipeline::new(&source, &NoCache, &sink, PipelineOptions::default());
//!
//! let summary = pipeline
//!     .run(&CsvLogLoader::new("resources/migration_log_input.csv"), IndexOptions::default())
//!     .unwrap();
//! println!("{summary}");
//! ```

mod summary;
mod worker;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use crate::cache::{CacheStore, QueryShape};
use crate::error::Result;
use crate::migration_log::MigrationLogLoader;
use crate::output::OutputSink;
use crate::reconcile::{IndexOptions, ReconciliationIndex};
use crate::source::LiveItemSource;

pub use summary::Summary;
use worker::Context;

/// Default number of principals processed at once.
pub const DEFAULT_CONCURRENCY: usize = 25;

/// Provider error that is expected for some principals.
pub const DRIVE_APPS_DISABLED: &str = "The domain administrators have disabled Drive apps.";

/// Tunables for a [`Pipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Maximum number of principals in flight.
    pub concurrency: usize,
    /// Provider messages logged as warnings instead of errors.
    pub known_errors: Vec<String>,
    /// Log principals by position instead of by address.
    pub redact_principals: bool,
    /// Query shape whose fingerprint keys the cache.
    pub query_shape: QueryShape,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            known_errors: vec![DRIVE_APPS_DISABLED.to_string()],
            redact_principals: false,
            query_shape: QueryShape::default(),
        }
    }
}

/// Per-worker counters, merged after the pool drains.
#[derive(Debug, Default)]
struct Tally {
    matched_items: usize,
    cache_hits: usize,
    cache_misses: usize,
    failed: Vec<(usize, String)>,
    known_failures: Vec<(usize, String)>,
}

impl Tally {
    fn merge(&mut self, other: Self) {
        self.matched_items += other.matched_items;
        self.cache_hits += other.cache_hits;
        self.cache_misses += other.cache_misses;
        self.failed.extend(other.failed);
        self.known_failures.extend(other.known_failures);
    }
}

/// Drives the per-principal work over shared collaborators.
pub struct Pipeline<'a> {
    source: &'a dyn LiveItemSource,
    cache: &'a dyn CacheStore,
    sink: &'a dyn OutputSink,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline.
    #[must_use]
    pub fn new(
        source: &'a dyn LiveItemSource,
        cache: &'a dyn CacheStore,
        sink: &'a dyn OutputSink,
        options: PipelineOptions,
    ) -> Self {
        Self {
            source,
            cache,
            sink,
            options,
        }
    }

    /// The options this pipeline runs with.
    #[must_use]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Loads the log, builds the index and processes every principal.
    ///
    /// # Errors
    ///
    /// Returns an error only if the migration log cannot be loaded.
    /// Per-principal failures are reported in the [`Summary`].
    pub fn run(
        &self,
        loader: &dyn MigrationLogLoader,
        index_options: IndexOptions,
    ) -> Result<Summary> {
        let started = Instant::now();
        let log = loader.load_rows()?;
        let invalid_rows = log.invalid_rows;
        let (entries, quarantined_rows) = log.into_entries();

        let index = ReconciliationIndex::build(entries, index_options);
        log::info!(
            "Indexed {} log rows into {} keys in {}ms",
            index.total_rows(),
            index.len(),
            started.elapsed().as_millis()
        );

        let mut summary = self.run_with_index(&index);
        summary.invalid_rows = invalid_rows;
        summary.quarantined_rows = quarantined_rows;

        log::info!("Run finished in {}ms", started.elapsed().as_millis());
        Ok(summary)
    }

    /// Processes every principal of an already built index.
    #[must_use]
    pub fn run_with_index(&self, index: &ReconciliationIndex) -> Summary {
        let principals = index.principals();
        let fingerprint = self.options.query_shape.fingerprint();
        let context = Context {
            index,
            source: self.source,
            cache: self.cache,
            sink: self.sink,
            fingerprint: &fingerprint,
        };

        let workers = self.options.concurrency.clamp(1, principals.len().max(1));
        log::info!(
            "Processing {} principals with {workers} workers",
            principals.len()
        );

        let cursor = AtomicUsize::new(0);
        let mut tally = Tally::default();
        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| scope.spawn(|| self.drain(&context, principals, &cursor)))
                .collect();
            for handle in handles {
                match handle.join() {
                    Ok(worker_tally) => tally.merge(worker_tally),
                    Err(_) => log::error!("pipeline worker panicked"),
                }
            }
        });

        tally.failed.sort();
        tally.known_failures.sort();
        let unmatched = index.unmatched_entries();
        if !unmatched.is_empty() {
            log::warn!("{} log rows were not matched", unmatched.len());
        }

        Summary {
            total_rows: index.total_rows(),
            key_count: index.len(),
            collision_count: index.collisions().len(),
            principal_count: principals.len(),
            matched_items: tally.matched_items,
            usage_histogram: index.usage_histogram(),
            unmatched,
            character_stats: index.character_stats(),
            failed_principals: tally.failed.into_iter().map(|(_, label)| label).collect(),
            known_failure_principals: tally
                .known_failures
                .into_iter()
                .map(|(_, label)| label)
                .collect(),
            cache_hits: tally.cache_hits,
            cache_misses: tally.cache_misses,
            ..Summary::default()
        }
    }

    /// Takes principals off the shared cursor until none are left.
    fn drain(&self, context: &Context<'_>, principals: &[String], cursor: &AtomicUsize) -> Tally {
        let mut tally = Tally::default();
        loop {
            let position = cursor.fetch_add(1, Ordering::Relaxed);
            let Some(principal) = principals.get(position) else {
                break;
            };
            let label = self.label(principal, position);

            match context.process(principal, &label) {
                Ok(report) => {
                    tally.matched_items += report.matched_items;
                    if report.cache_hit {
                        tally.cache_hits += 1;
                    } else {
                        tally.cache_misses += 1;
                    }
                }
                Err(e) if e.is_known_source_failure(&self.options.known_errors) => {
                    log::warn!("Skipping {label}: {e}");
                    tally.known_failures.push((position, label));
                }
                Err(e) => {
                    log::error!("Failed to process {label}: {e}");
                    tally.failed.push((position, label));
                }
            }
        }
        tally
    }

    fn label(&self, principal: &str, position: usize) -> String {
        if self.options.redact_principals {
            format!("principal index {position}")
        } else {
            principal.to_string()
        }
    }
}
