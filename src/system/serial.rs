// src/system/serial.rs

//! Baseline strategy: everything runs on the caller's thread.

use std::sync::Arc;

use tracing::trace;

use crate::system::{Runnable, TaskSystem};
use crate::types::LaunchId;

/// Correctness reference. No threads, no queue, no state.
#[derive(Debug, Default)]
pub struct SerialSystem;

impl SerialSystem {
    /// The worker count is accepted for interface parity and ignored.
    pub fn new(_num_threads: usize) -> Self {
        Self
    }
}

impl TaskSystem for SerialSystem {
    fn name(&self) -> &'static str {
        "Serial"
    }

    fn submit(&self, runnable: Arc<dyn Runnable>, total: usize) {
        trace!(total, "serial: running launch on caller thread");
        for index in 0..total {
            runnable.run_task(index, total);
        }
    }

    /// Runs the launch to completion before returning, so prerequisites are
    /// trivially satisfied and ignored. Always returns `0`.
    fn submit_async(
        &self,
        runnable: Arc<dyn Runnable>,
        total: usize,
        _prerequisites: &[LaunchId],
    ) -> LaunchId {
        self.submit(runnable, total);
        0
    }

    fn wait(&self) {}
}
