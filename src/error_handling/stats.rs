//! Import statistics tracking.
//!
//! Counts normalizer outcomes during a bulk import. Counters are atomic so a
//! single tracker can be shared between tasks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ImportOutcome;

/// Thread-safe import outcome tracker.
///
/// Every `ImportOutcome` is initialized to zero on creation.
pub struct ImportStats {
    outcomes: HashMap<ImportOutcome, AtomicUsize>,
}

impl Default for ImportStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportStats {
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for outcome in ImportOutcome::iter() {
            outcomes.insert(outcome, AtomicUsize::new(0));
        }
        ImportStats { outcomes }
    }

    pub fn increment(&self, outcome: ImportOutcome) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn get(&self, outcome: ImportOutcome) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total number of inputs seen, whatever their outcome.
    pub fn total(&self) -> usize {
        self.outcomes
            .values()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }

    /// Inputs that produced or matched a stored address.
    pub fn stored(&self) -> usize {
        self.get(ImportOutcome::Linked) + self.get(ImportOutcome::RawOnly)
    }

    /// Inputs that were rejected.
    pub fn failed(&self) -> usize {
        self.get(ImportOutcome::InvalidValue) + self.get(ImportOutcome::StorageFailure)
    }
}
