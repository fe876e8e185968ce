// src/engine/workload.rs

//! Synthetic workload used by the plan runner.
//!
//! Each launch in a plan gets a [`LaunchProbe`]: a [`Runnable`] that burns a
//! configurable amount of CPU per invocation and records enough to check the
//! scheduler afterwards (per-index hit counts, finished count, and whether any
//! invocation started before a prerequisite launch had fully finished).

use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{trace, warn};

use crate::system::Runnable;

#[derive(Debug)]
pub struct LaunchProbe {
    name: String,
    total: usize,
    work: u64,
    prerequisites: Vec<Arc<LaunchProbe>>,
    hits: Vec<AtomicUsize>,
    finished: AtomicUsize,
    ordering_violations: AtomicUsize,
    out_of_range: AtomicUsize,
}

impl LaunchProbe {
    pub fn new(
        name: impl Into<String>,
        total: usize,
        work: u64,
        prerequisites: Vec<Arc<LaunchProbe>>,
    ) -> Self {
        Self {
            name: name.into(),
            total,
            work,
            prerequisites,
            hits: (0..total).map(|_| AtomicUsize::new(0)).collect(),
            finished: AtomicUsize::new(0),
            ordering_violations: AtomicUsize::new(0),
            out_of_range: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether every invocation of this launch has finished.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire) == self.total
    }

    /// Invocations executed so far (including duplicates).
    pub fn executed(&self) -> usize {
        self.hits.iter().map(|h| h.load(Ordering::Acquire)).sum::<usize>()
            + self.out_of_range.load(Ordering::Acquire)
    }

    /// Indices that ran more than once.
    pub fn duplicated_indices(&self) -> Vec<usize> {
        self.indices_where(|hits| hits > 1)
    }

    /// Indices that never ran.
    pub fn missing_indices(&self) -> Vec<usize> {
        self.indices_where(|hits| hits == 0)
    }

    /// Invocations that started while some prerequisite was unfinished.
    pub fn ordering_violations(&self) -> usize {
        self.ordering_violations.load(Ordering::Acquire)
    }

    /// Invocations called with an index outside `0..total` or a wrong total.
    pub fn out_of_range(&self) -> usize {
        self.out_of_range.load(Ordering::Acquire)
    }

    fn indices_where(&self, pred: impl Fn(usize) -> bool) -> Vec<usize> {
        self.hits
            .iter()
            .enumerate()
            .filter(|(_, hits)| pred(hits.load(Ordering::Acquire)))
            .map(|(index, _)| index)
            .collect()
    }
}

impl Runnable for LaunchProbe {
    fn run_task(&self, index: usize, total: usize) {
        for prerequisite in &self.prerequisites {
            if !prerequisite.is_finished() {
                warn!(
                    launch = %self.name,
                    prerequisite = %prerequisite.name,
                    index,
                    "invocation started before prerequisite finished"
                );
                self.ordering_violations.fetch_add(1, Ordering::AcqRel);
            }
        }

        if total != self.total || index >= self.total {
            warn!(launch = %self.name, index, total, "invocation outside launch bounds");
            self.out_of_range.fetch_add(1, Ordering::AcqRel);
            return;
        }

        trace!(launch = %self.name, index, total, "probe invocation");

        let mut acc = index as u64;
        for i in 0..self.work {
            acc = black_box(acc.wrapping_mul(6364136223846793005).wrapping_add(i));
        }
        black_box(acc);

        self.hits[index].fetch_add(1, Ordering::AcqRel);
        self.finished.fetch_add(1, Ordering::AcqRel);
    }
}
