//! Per-outcome counters for a crawl run
//!
//! Workers never report failures upward; the coordinator only observes the
//! join barrier. These counters are the one place per-item outcomes are
//! aggregated, so the final report can say more than "finished".

use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared outcome counters, updated by workers as items reach a terminal
/// state.
#[derive(Debug, Default)]
pub struct CrawlStats {
    completed: AtomicUsize,
    failed: AtomicUsize,
    parse_failures: AtomicUsize,
    dropped: AtomicUsize,
    records: AtomicUsize,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Items fetched, parsed, and persisted (including empty payloads)
    pub completed: usize,
    /// Items that exhausted their retries or failed to persist
    pub failed: usize,
    /// Items whose payload claimed to be JSON but was not
    pub parse_failures: usize,
    /// Items dropped on a non-retryable HTTP anomaly (redirect, 4xx)
    pub dropped: usize,
    /// Total records written to storage
    pub records: usize,
}

impl CrawlStats {
    /// Records a successfully completed item and the rows it produced.
    pub fn record_completed(&self, records: usize) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.records.fetch_add(records, Ordering::Relaxed);
    }

    /// Records an item that exhausted its retries or could not be stored.
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an item dropped on a malformed payload.
    pub fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an item dropped on a non-retryable HTTP anomaly.
    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a consistent-enough snapshot for reporting.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            records: self.records.load(Ordering::Relaxed),
        }
    }
}
