// src/system/work_queue.rs

//! FIFO of outstanding invocations, drawn only from ready launches.
//!
//! Logically this is the flattened sequence of `(launch, index)` pairs. It is
//! stored as one cursor per ready launch so that readying a launch with a
//! large `total` costs O(1) instead of pushing `total` entries.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::dag::ReadyLaunch;
use crate::system::Runnable;
use crate::types::LaunchId;

/// One `(launch, index)` unit of work, ready to execute.
pub struct Invocation {
    pub launch: LaunchId,
    pub index: usize,
    pub total: usize,
    runnable: Arc<dyn Runnable>,
}

impl Invocation {
    /// Execute the invocation on the current thread.
    pub fn run(&self) {
        self.runnable.run_task(self.index, self.total);
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("launch", &self.launch)
            .field("index", &self.index)
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

/// Remaining indices of one ready launch.
struct Cursor {
    launch: LaunchId,
    next_index: usize,
    total: usize,
    runnable: Arc<dyn Runnable>,
}

#[derive(Default)]
pub struct WorkQueue {
    cursors: VecDeque<Cursor>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every invocation of `launch` visible to workers, after everything
    /// already queued.
    pub fn push_launch(&mut self, launch: ReadyLaunch) {
        if launch.total == 0 {
            return;
        }
        self.cursors.push_back(Cursor {
            launch: launch.id,
            next_index: 0,
            total: launch.total,
            runnable: launch.runnable,
        });
    }

    /// Dequeue the next invocation in FIFO order. Each index is handed out
    /// exactly once.
    pub fn pop(&mut self) -> Option<Invocation> {
        let cursor = self.cursors.front_mut()?;

        let invocation = Invocation {
            launch: cursor.launch,
            index: cursor.next_index,
            total: cursor.total,
            runnable: Arc::clone(&cursor.runnable),
        };

        cursor.next_index += 1;
        if cursor.next_index == cursor.total {
            self.cursors.pop_front();
        }

        Some(invocation)
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Number of invocations not yet dequeued.
    pub fn len(&self) -> usize {
        self.cursors
            .iter()
            .map(|cursor| cursor.total - cursor.next_index)
            .sum()
    }
}

impl fmt::Debug for WorkQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkQueue")
            .field("launches", &self.cursors.len())
            .field("invocations", &self.len())
            .finish()
    }
}
