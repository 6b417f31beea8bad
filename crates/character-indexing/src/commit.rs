//! Per-batch commit and rollback.
//!
//! Documents are added one at a time on the calling task, followed by a
//! single commit. Any failed add or commit rolls the whole batch back, so
//! readers never see part of a batch.

use serde::Serialize;
use tracing::{info, warn};

use crate::batch::BuiltDocuments;
use crate::error::IndexingError;
use crate::stats::RunStatistics;
use crate::updater::IndexUpdater;

/// A batch that committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub batch: usize,
    /// Documents made visible by the commit
    pub committed: u64,
}

/// Applies built batches to an updater.
pub struct CommitCoordinator<'a, U: IndexUpdater + ?Sized> {
    updater: &'a mut U,
    stats: &'a RunStatistics,
}

impl<'a, U: IndexUpdater + ?Sized> CommitCoordinator<'a, U> {
    pub fn new(updater: &'a mut U, stats: &'a RunStatistics) -> Self {
        Self { updater, stats }
    }

    /// Add every built document of the batch, then commit once.
    ///
    /// On failure the batch is rolled back and `BatchRolledBack` is returned.
    /// A rollback that itself fails is fatal.
    pub async fn apply(
        &mut self,
        batch: usize,
        documents: &mut BuiltDocuments,
    ) -> Result<BatchOutcome, IndexingError> {
        let mut staged: u64 = 0;
        let mut failure = None;

        while let Some(doc) = documents.next().await {
            staged += 1;
            if let Err(e) = self.updater.add(&doc) {
                failure = Some(e);
                break;
            }
        }

        let failure = match failure {
            Some(e) => Some(e),
            None => self.updater.commit().err(),
        };

        let Some(error) = failure else {
            self.stats.record_processed(staged);
            self.stats.record_batch_committed();
            info!(batch, documents = staged, "Committed batch");
            return Ok(BatchOutcome {
                batch,
                committed: staged,
            });
        };

        // Remaining builds must finish before the writer is reset.
        let discarded = staged + documents.drain().await;

        self.updater.rollback().map_err(|e| {
            IndexingError::Fatal(format!(
                "rollback of batch {} on {} failed: {}",
                batch,
                self.updater.name(),
                e
            ))
        })?;

        self.stats.record_rolled_back(discarded);
        self.stats.record_batch_rolled_back();
        warn!(batch, discarded, error = %error, "Rolled back batch");

        Err(IndexingError::BatchRolledBack {
            batch,
            reason: error.to_string(),
        })
    }
}
