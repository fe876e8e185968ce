use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tasksys::Runnable;

/// One observed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub tag: String,
    pub index: usize,
    pub total: usize,
    /// Logical timestamp taken when the invocation started.
    pub started: u64,
    /// Logical timestamp taken just before the invocation returned.
    pub finished: u64,
}

/// Shared log for every [`RecordingRunnable`] created from it.
///
/// All runnables draw timestamps from one sequentially consistent counter, so
/// "every invocation of A finished before any invocation of B started" can be
/// checked by comparing timestamps.
#[derive(Debug, Default)]
pub struct EventLog {
    clock: AtomicU64,
    records: Mutex<Vec<Record>>,
}

impl EventLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A runnable that records under `tag`.
    pub fn runnable(self: &Arc<Self>, tag: &str) -> Arc<RecordingRunnable> {
        Arc::new(RecordingRunnable {
            tag: tag.to_string(),
            log: Arc::clone(self),
            delay: None,
        })
    }

    /// Like [`runnable`](Self::runnable), but every invocation sleeps for
    /// `delay` before finishing.
    pub fn slow_runnable(self: &Arc<Self>, tag: &str, delay: Duration) -> Arc<RecordingRunnable> {
        Arc::new(RecordingRunnable {
            tag: tag.to_string(),
            log: Arc::clone(self),
            delay: Some(delay),
        })
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted indices observed for `tag` (duplicates kept).
    pub fn indices_for(&self, tag: &str) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.tag == tag)
            .map(|r| r.index)
            .collect();
        indices.sort_unstable();
        indices
    }

    /// How many times each tag was invoked.
    pub fn counts_by_tag(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for r in self.records.lock().unwrap().iter() {
            *counts.entry(r.tag.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Whether every invocation of `first` finished before any invocation of
    /// `second` started. Panics if either tag has no records.
    pub fn all_finished_before(&self, first: &str, second: &str) -> bool {
        let records = self.records.lock().unwrap();
        let last_finish = records
            .iter()
            .filter(|r| r.tag == first)
            .map(|r| r.finished)
            .max()
            .unwrap_or_else(|| panic!("no records for {first}"));
        let first_start = records
            .iter()
            .filter(|r| r.tag == second)
            .map(|r| r.started)
            .min()
            .unwrap_or_else(|| panic!("no records for {second}"));
        last_finish < first_start
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::SeqCst)
    }
}

/// A [`Runnable`] that appends a [`Record`] to its [`EventLog`] per call.
#[derive(Debug)]
pub struct RecordingRunnable {
    tag: String,
    log: Arc<EventLog>,
    delay: Option<Duration>,
}

impl Runnable for RecordingRunnable {
    fn run_task(&self, index: usize, total: usize) {
        let started = self.log.tick();
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        let finished = self.log.tick();

        self.log.records.lock().unwrap().push(Record {
            tag: self.tag.clone(),
            index,
            total,
            started,
            finished,
        });
    }
}
