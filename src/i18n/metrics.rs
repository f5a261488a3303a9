//! Lookup metrics and observability.
//!
//! Tracks lexicon hits and misses, the outcome of miss repairs, and
//! requests for which no language could be resolved.

use crate::i18n::RepairOutcome;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for one [`Localizer`](crate::localizer::Localizer).
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Keys found in a lexicon
    hits: AtomicUsize,

    /// Keys found in no lexicon
    misses: AtomicUsize,

    /// Placeholder rows written by miss repair
    repairs_inserted: AtomicUsize,

    /// Misses whose key already had a stored row
    repairs_present: AtomicUsize,

    /// Miss repairs that failed to write
    repair_failures: AtomicUsize,

    /// Requests with neither a preferred nor the default language loaded
    unresolved_languages: AtomicUsize,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of a repair attempt.
    pub fn record_repair(&self, outcome: RepairOutcome) {
        match outcome {
            RepairOutcome::Inserted => {
                self.repairs_inserted.fetch_add(1, Ordering::Relaxed);
            }
            RepairOutcome::AlreadyPresent => {
                self.repairs_present.fetch_add(1, Ordering::Relaxed);
            }
            RepairOutcome::Disabled => {}
        }
    }

    pub fn record_repair_failure(&self) {
        self.repair_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unresolved_language(&self) {
        self.unresolved_languages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn repairs_inserted(&self) -> usize {
        self.repairs_inserted.load(Ordering::Relaxed)
    }

    pub fn repairs_present(&self) -> usize {
        self.repairs_present.load(Ordering::Relaxed)
    }

    pub fn repair_failures(&self) -> usize {
        self.repair_failures.load(Ordering::Relaxed)
    }

    pub fn unresolved_languages(&self) -> usize {
        self.unresolved_languages.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let misses = self.misses();
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            hits,
            misses,
            hit_rate,
            repairs_inserted: self.repairs_inserted(),
            repairs_present: self.repairs_present(),
            repair_failures: self.repair_failures(),
            unresolved_languages: self.unresolved_languages(),
        }
    }
}

/// Snapshot of lookup statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub hits: usize,
    pub misses: usize,

    /// Hit rate as a percentage (0-100)
    pub hit_rate: f64,

    pub repairs_inserted: usize,
    pub repairs_present: usize,
    pub repair_failures: usize,
    pub unresolved_languages: usize,
}
