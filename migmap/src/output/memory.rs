//! In-memory sink.

use std::sync::{Mutex, PoisonError};

use crate::error::Result;
use crate::item::MatchedItem;
use crate::output::OutputSink;

/// Collects matched items in memory, remembering batch boundaries.
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Mutex<Vec<Vec<MatchedItem>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every item received so far, in arrival order.
    #[must_use]
    pub fn items(&self) -> Vec<MatchedItem> {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .flatten()
            .cloned()
            .collect()
    }

    /// Number of batches received.
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl OutputSink for MemorySink {
    fn append_matched_items(&self, items: &[MatchedItem]) -> Result<()> {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(items.to_vec());
        Ok(())
    }
}
