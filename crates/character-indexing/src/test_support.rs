//! Fakes shared by the unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use character_types::{IndexableDocument, RawRecord};

use crate::builder::{BuildError, CharacterDocumentBuilder, DocumentBuilder};
use crate::error::IndexingError;
use crate::source::{RecordSource, SourceRecords};
use crate::updater::IndexUpdater;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Add(String),
    Commit,
    Rollback,
    Close,
}

#[derive(Debug, Default)]
struct Recorded {
    ops: Vec<Op>,
    adds: usize,
    pending: Vec<String>,
    committed: Vec<String>,
}

/// Updater that records every call and fails on request.
///
/// Clones share the same log, so a test can keep a handle after moving the
/// updater into a session.
#[derive(Debug, Clone, Default)]
pub struct RecordingUpdater {
    recorded: Arc<Mutex<Recorded>>,
    fail_add_on: Option<usize>,
    fail_commit: bool,
    fail_rollback: bool,
    fail_close: bool,
}

impl RecordingUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the nth add of the run (1-based).
    pub fn fail_add_on(mut self, n: usize) -> Self {
        self.fail_add_on = Some(n);
        self
    }

    pub fn fail_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    pub fn fail_rollback(mut self) -> Self {
        self.fail_rollback = true;
        self
    }

    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn ops(&self) -> Vec<Op> {
        self.recorded.lock().unwrap().ops.clone()
    }

    pub fn committed_ids(&self) -> Vec<String> {
        let mut ids = self.recorded.lock().unwrap().committed.clone();
        ids.sort();
        ids
    }

    pub fn close_count(&self) -> usize {
        self.ops().iter().filter(|op| **op == Op::Close).count()
    }
}

impl IndexUpdater for RecordingUpdater {
    fn add(&mut self, document: &IndexableDocument) -> Result<(), IndexingError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.adds += 1;
        recorded.ops.push(Op::Add(document.id().to_string()));
        if self.fail_add_on == Some(recorded.adds) {
            return Err(IndexingError::Index(format!("add {} failed", document.id())));
        }
        recorded.pending.push(document.id().to_string());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), IndexingError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.ops.push(Op::Commit);
        if self.fail_commit {
            return Err(IndexingError::Index("commit failed".to_string()));
        }
        let pending = std::mem::take(&mut recorded.pending);
        recorded.committed.extend(pending);
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), IndexingError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.ops.push(Op::Rollback);
        if self.fail_rollback {
            return Err(IndexingError::Index("rollback failed".to_string()));
        }
        recorded.pending.clear();
        Ok(())
    }

    fn close(&mut self) -> Result<(), IndexingError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.ops.push(Op::Close);
        recorded.pending.clear();
        if self.fail_close {
            return Err(IndexingError::Index("close failed".to_string()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Character builder that fails or panics for chosen ids.
#[derive(Debug, Default)]
pub struct FlakyBuilder {
    fail: HashSet<String>,
    panic: HashSet<String>,
}

impl FlakyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(mut self, id: &str) -> Self {
        self.fail.insert(id.to_string());
        self
    }

    pub fn panic_on(mut self, id: &str) -> Self {
        self.panic.insert(id.to_string());
        self
    }
}

impl DocumentBuilder for FlakyBuilder {
    fn build(&self, record: &RawRecord) -> Result<IndexableDocument, BuildError> {
        if self.panic.contains(&record.id) {
            panic!("builder panicked on {}", record.id);
        }
        if self.fail.contains(&record.id) {
            return Err(BuildError::Rejected {
                id: record.id.clone(),
                reason: "flaky".to_string(),
            });
        }
        CharacterDocumentBuilder::new().build(record)
    }
}

/// Builder that sleeps and tracks peak concurrency.
#[derive(Debug, Default)]
pub struct SlowBuilder {
    delay_ms: u64,
    in_flight: AtomicUsize,
    pub peak: AtomicUsize,
}

impl SlowBuilder {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::default()
        }
    }
}

impl DocumentBuilder for SlowBuilder {
    fn build(&self, record: &RawRecord) -> Result<IndexableDocument, BuildError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(self.delay_ms));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        CharacterDocumentBuilder::new().build(record)
    }
}

/// Source whose load always fails.
#[derive(Debug)]
pub struct BrokenSource(pub &'static str);

impl RecordSource for BrokenSource {
    fn name(&self) -> &str {
        self.0
    }

    fn load(&self) -> Result<SourceRecords, IndexingError> {
        Err(IndexingError::Source {
            name: self.0.to_string(),
            message: "unreadable".to_string(),
        })
    }
}
