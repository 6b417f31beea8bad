//! Concurrent document building for one batch.
//!
//! Each record is built on the blocking pool, gated by a semaphore with one
//! permit per worker. Results are yielded in completion order, not
//! submission order.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, warn};

use character_types::{IndexableDocument, RawRecord};

use crate::builder::DocumentBuilder;
use crate::stats::RunStatistics;

/// Bounded worker pool running a [`DocumentBuilder`] over batches.
pub struct BatchProcessor {
    builder: Arc<dyn DocumentBuilder>,
    workers: Arc<Semaphore>,
    max_workers: usize,
    stats: Arc<RunStatistics>,
}

impl BatchProcessor {
    /// Create a pool with `max_workers` concurrent builds (at least one).
    pub fn new(
        builder: Arc<dyn DocumentBuilder>,
        max_workers: usize,
        stats: Arc<RunStatistics>,
    ) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            builder,
            workers: Arc::new(Semaphore::new(max_workers)),
            max_workers,
            stats,
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Dispatch every record of the batch.
    ///
    /// Must be called within a Tokio runtime. Failed records are counted in
    /// the run statistics and never appear in the returned stream.
    pub fn process(&self, records: Vec<RawRecord>) -> BuiltDocuments {
        let submitted = records.len();
        let mut tasks = JoinSet::new();

        for record in records {
            let builder = Arc::clone(&self.builder);
            let workers = Arc::clone(&self.workers);
            let stats = Arc::clone(&self.stats);

            tasks.spawn(async move {
                let Ok(_permit) = workers.acquire_owned().await else {
                    error!(id = %record.id, "Worker pool closed");
                    stats.record_failed();
                    return None;
                };

                let id = record.id.clone();
                match tokio::task::spawn_blocking(move || builder.build(&record)).await {
                    Ok(Ok(doc)) => Some(doc),
                    Ok(Err(e)) => {
                        warn!(id = %id, error = %e, "Failed to build document");
                        stats.record_failed();
                        None
                    }
                    Err(e) => {
                        error!(id = %id, error = %e, "Document build panicked");
                        stats.record_failed();
                        None
                    }
                }
            });
        }

        BuiltDocuments {
            tasks,
            submitted,
            stats: Arc::clone(&self.stats),
        }
    }
}

/// Successfully built documents of one batch, in completion order.
pub struct BuiltDocuments {
    tasks: JoinSet<Option<IndexableDocument>>,
    submitted: usize,
    stats: Arc<RunStatistics>,
}

impl BuiltDocuments {
    /// Next built document, or `None` once every record has resolved.
    pub async fn next(&mut self) -> Option<IndexableDocument> {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(Some(doc)) => return Some(doc),
                Ok(None) => {}
                Err(e) => {
                    error!(error = %e, "Build task failed");
                    self.stats.record_failed();
                }
            }
        }
        None
    }

    /// Wait for the remaining records and discard them.
    ///
    /// Returns how many successfully built documents were dropped.
    pub async fn drain(&mut self) -> u64 {
        let mut discarded = 0;
        while self.next().await.is_some() {
            discarded += 1;
        }
        discarded
    }

    /// Records dispatched for this batch.
    pub fn submitted(&self) -> usize {
        self.submitted
    }
}
