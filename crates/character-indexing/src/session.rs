//! Indexing session: sources -> batches -> commits.
//!
//! The session owns the index updater for its whole life. It is opened once,
//! written across every batch, and closed exactly once on every exit path,
//! including drop.
//!
//! ```text
//! Created -> Opened -> (Running <-> CommittingBatch)* -> Closing -> Closed
//!                 \___________________________________________/
//!                                   v
//!                                 Failed
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use character_types::{RawRecord, Settings};

use crate::batch::BatchProcessor;
use crate::builder::{CharacterDocumentBuilder, DocumentBuilder};
use crate::commit::{BatchOutcome, CommitCoordinator};
use crate::error::IndexingError;
use crate::source::RecordSource;
use crate::stats::{RunStatistics, RunStatsSnapshot};
use crate::updater::IndexUpdater;

/// Lifecycle state of an [`IndexingSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Created,
    Opened,
    Running,
    CommittingBatch,
    Closing,
    Closed,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Batch sizing and worker count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Records per batch
    pub batch_size: usize,
    /// Concurrent document builds
    pub max_workers: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_workers: 4,
        }
    }
}

impl SessionConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }
}

impl From<&Settings> for SessionConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            batch_size: settings.batch_size,
            max_workers: settings.max_workers,
        }
    }
}

/// Drives records from sources into one index updater.
pub struct IndexingSession<U: IndexUpdater> {
    config: SessionConfig,
    state: SessionState,
    updater: Option<U>,
    processor: BatchProcessor,
    stats: Arc<RunStatistics>,
    batches: usize,
    closed: bool,
}

impl<U: IndexUpdater> IndexingSession<U> {
    /// Create a session that builds documents with [`CharacterDocumentBuilder`].
    pub fn new(config: SessionConfig) -> Self {
        Self::with_builder(config, Arc::new(CharacterDocumentBuilder::new()))
    }

    pub fn with_builder(config: SessionConfig, builder: Arc<dyn DocumentBuilder>) -> Self {
        let config = SessionConfig {
            batch_size: config.batch_size.max(1),
            max_workers: config.max_workers.max(1),
        };
        let stats = Arc::new(RunStatistics::new());
        let processor = BatchProcessor::new(builder, config.max_workers, Arc::clone(&stats));
        Self {
            config,
            state: SessionState::Created,
            updater: None,
            processor,
            stats,
            batches: 0,
            closed: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn stats(&self) -> &Arc<RunStatistics> {
        &self.stats
    }

    /// Acquire the index updater. Allowed once, from `Created`.
    pub fn open<F>(&mut self, open: F) -> Result<(), IndexingError>
    where
        F: FnOnce() -> Result<U, IndexingError>,
    {
        if self.state != SessionState::Created {
            return Err(IndexingError::InvalidState(format!(
                "cannot open session in state {}",
                self.state
            )));
        }

        match open() {
            Ok(updater) => {
                info!(
                    updater = updater.name(),
                    batch_size = self.config.batch_size,
                    max_workers = self.config.max_workers,
                    "Opened indexing session"
                );
                self.updater = Some(updater);
                self.state = SessionState::Opened;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Failed;
                Err(IndexingError::Fatal(format!("failed to open index: {}", e)))
            }
        }
    }

    /// Index every source in order.
    ///
    /// Unreadable sources and rolled-back batches are logged and skipped.
    /// Only fatal errors stop the run.
    pub async fn index_sources(
        &mut self,
        sources: &[Box<dyn RecordSource>],
    ) -> Result<(), IndexingError> {
        for source in sources {
            self.index_source(source.as_ref()).await?;
        }
        Ok(())
    }

    /// Load one source and index it in batches.
    pub async fn index_source(&mut self, source: &dyn RecordSource) -> Result<(), IndexingError> {
        self.ensure_writable()?;

        let loaded = match source.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(source = source.name(), error = %e, "Skipping unreadable source");
                self.stats.record_source_skipped();
                return Ok(());
            }
        };

        info!(source = source.name(), records = loaded.len(), "Processing source");
        self.stats.record_total(loaded.len() as u64);

        for rejection in &loaded.rejected {
            warn!(source = source.name(), error = %rejection, "Skipping malformed entry");
            self.stats.record_failed();
        }

        let mut records = loaded.records.into_iter();
        loop {
            let batch: Vec<RawRecord> = records.by_ref().take(self.config.batch_size).collect();
            if batch.is_empty() {
                break;
            }
            self.run_batch(batch).await?;
        }
        Ok(())
    }

    /// Build and commit one batch.
    ///
    /// Returns `None` when the batch was rolled back. Records passed here
    /// directly are not added to the run total.
    pub async fn run_batch(
        &mut self,
        records: Vec<RawRecord>,
    ) -> Result<Option<BatchOutcome>, IndexingError> {
        self.ensure_writable()?;
        self.batches += 1;
        let batch_no = self.batches;

        self.state = SessionState::Running;
        let mut documents = self.processor.process(records);
        let submitted = documents.submitted();

        self.state = SessionState::CommittingBatch;
        let Some(updater) = self.updater.as_mut() else {
            self.state = SessionState::Failed;
            return Err(IndexingError::InvalidState("index updater missing".to_string()));
        };

        let result = CommitCoordinator::new(updater, &self.stats)
            .apply(batch_no, &mut documents)
            .await;

        match result {
            Ok(outcome) => {
                self.state = SessionState::Running;
                info!(
                    batch = batch_no,
                    submitted,
                    committed = outcome.committed,
                    "Processed batch"
                );
                Ok(Some(outcome))
            }
            Err(e) if e.is_fatal() => {
                error!(batch = batch_no, error = %e, "Fatal error, stopping session");
                self.state = SessionState::Failed;
                Err(e)
            }
            Err(e) => {
                error!(batch = batch_no, error = %e, "Batch failed, continuing");
                self.state = SessionState::Running;
                Ok(None)
            }
        }
    }

    /// Close the updater and finalize statistics.
    ///
    /// Runs on every path and only once: later calls return the same
    /// snapshot without touching the updater again.
    pub fn close(&mut self) -> Result<RunStatsSnapshot, IndexingError> {
        if self.closed {
            return Ok(self.stats.snapshot());
        }
        self.closed = true;

        let failed = self.state == SessionState::Failed;
        self.state = SessionState::Closing;

        let close_result = match self.updater.take() {
            Some(mut updater) => updater.close(),
            None => Ok(()),
        };

        self.stats.stop();
        let snapshot = self.stats.snapshot();
        snapshot.log_summary();

        match close_result {
            Ok(()) => {
                self.state = if failed {
                    SessionState::Failed
                } else {
                    SessionState::Closed
                };
                Ok(snapshot)
            }
            Err(e) => {
                error!(error = %e, "Failed to close index");
                self.state = SessionState::Failed;
                Err(IndexingError::Fatal(format!("failed to close index: {}", e)))
            }
        }
    }

    /// Open, index every source, close.
    ///
    /// The close happens even when opening or indexing fails; the first
    /// error wins.
    pub async fn run<F>(
        mut self,
        open: F,
        sources: &[Box<dyn RecordSource>],
    ) -> Result<RunStatsSnapshot, IndexingError>
    where
        F: FnOnce() -> Result<U, IndexingError>,
    {
        let result = match self.open(open) {
            Ok(()) => self.index_sources(sources).await,
            Err(e) => Err(e),
        };
        let closed = self.close();
        result?;
        closed
    }

    fn ensure_writable(&self) -> Result<(), IndexingError> {
        match self.state {
            SessionState::Opened | SessionState::Running => Ok(()),
            state => Err(IndexingError::InvalidState(format!(
                "cannot index in state {}",
                state
            ))),
        }
    }
}

impl<U: IndexUpdater> Drop for IndexingSession<U> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.close() {
                error!(error = %e, "Error closing session on drop");
            }
        }
    }
}
