//! Run-wide indexing statistics.
//!
//! Counters are atomic: worker tasks record build failures while the
//! controlling task records totals and commits.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Counters for one indexing session.
#[derive(Debug)]
pub struct RunStatistics {
    total: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
    rolled_back: AtomicU64,
    batches_committed: AtomicU64,
    batches_rolled_back: AtomicU64,
    sources_skipped: AtomicU64,
    started_at: DateTime<Utc>,
    started: Instant,
    stopped: OnceLock<(DateTime<Utc>, Duration)>,
}

impl Default for RunStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStatistics {
    /// Start a run now.
    pub fn new() -> Self {
        Self {
            total: AtomicU64::new(0),
            processed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            rolled_back: AtomicU64::new(0),
            batches_committed: AtomicU64::new(0),
            batches_rolled_back: AtomicU64::new(0),
            sources_skipped: AtomicU64::new(0),
            started_at: Utc::now(),
            started: Instant::now(),
            stopped: OnceLock::new(),
        }
    }

    pub fn record_total(&self, n: u64) {
        self.total.fetch_add(n, Ordering::Relaxed);
    }

    /// Credit documents whose batch committed.
    pub fn record_processed(&self, n: u64) {
        self.processed.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Count built documents discarded by a rollback.
    pub fn record_rolled_back(&self, n: u64) {
        self.rolled_back.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_batch_committed(&self) {
        self.batches_committed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_rolled_back(&self) {
        self.batches_rolled_back.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_source_skipped(&self) {
        self.sources_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Finalize the run. Only the first call takes effect.
    pub fn stop(&self) {
        self.stopped
            .get_or_init(|| (Utc::now(), self.started.elapsed()));
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get().is_some()
    }

    /// Time from start to stop, or to now while running.
    pub fn elapsed(&self) -> Duration {
        self.stopped
            .get()
            .map(|(_, elapsed)| *elapsed)
            .unwrap_or_else(|| self.started.elapsed())
    }

    pub fn snapshot(&self) -> RunStatsSnapshot {
        RunStatsSnapshot {
            total: self.total.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            rolled_back: self.rolled_back.load(Ordering::Relaxed),
            batches_committed: self.batches_committed.load(Ordering::Relaxed),
            batches_rolled_back: self.batches_rolled_back.load(Ordering::Relaxed),
            sources_skipped: self.sources_skipped.load(Ordering::Relaxed),
            started_at: self.started_at,
            stopped_at: self.stopped.get().map(|(at, _)| *at),
            elapsed: self.elapsed(),
        }
    }
}

/// Point-in-time copy of [`RunStatistics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStatsSnapshot {
    pub total: u64,
    pub processed: u64,
    pub failed: u64,
    pub rolled_back: u64,
    pub batches_committed: u64,
    pub batches_rolled_back: u64,
    pub sources_skipped: u64,
    pub started_at: DateTime<Utc>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub elapsed: Duration,
}

impl RunStatsSnapshot {
    /// Committed documents per second of elapsed time.
    pub fn docs_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.processed as f64 / secs
        } else {
            0.0
        }
    }

    /// Write the end-of-run summary to the log.
    pub fn log_summary(&self) {
        info!("Indexing Statistics:");
        info!("Total documents: {}", self.total);
        info!("Successfully processed: {}", self.processed);
        info!("Failed: {}", self.failed);
        info!("Rolled back: {}", self.rolled_back);
        info!(
            "Batches committed: {}, rolled back: {}",
            self.batches_committed, self.batches_rolled_back
        );
        if self.sources_skipped > 0 {
            info!("Sources skipped: {}", self.sources_skipped);
        }
        info!("Total time: {:.2} seconds", self.elapsed.as_secs_f64());
        info!("Average speed: {:.2} docs/second", self.docs_per_second());
    }
}
