// src/system/spawn.rs

//! Spawn-per-task strategy: one fresh thread per invocation.
//!
//! Unbounded: the configured worker count is ignored.

use std::panic;
use std::sync::Arc;
use std::thread;

use tracing::{trace, warn};

use crate::system::{Runnable, TaskSystem};
use crate::types::LaunchId;

#[derive(Debug, Default)]
pub struct SpawnSystem;

impl SpawnSystem {
    pub fn new(_num_threads: usize) -> Self {
        Self
    }
}

impl TaskSystem for SpawnSystem {
    fn name(&self) -> &'static str {
        "Parallel + Always Spawn"
    }

    fn submit(&self, runnable: Arc<dyn Runnable>, total: usize) {
        trace!(total, "spawn: starting one thread per invocation");

        let runnable = &*runnable;
        let first_panic = thread::scope(|scope| {
            let handles: Vec<_> = (0..total)
                .map(|index| scope.spawn(move || runnable.run_task(index, total)))
                .collect();

            // Join everything before surfacing a failure so no thread outlives
            // the call.
            let mut first_panic = None;
            for (index, handle) in handles.into_iter().enumerate() {
                if let Err(payload) = handle.join() {
                    warn!(index, total, "spawn: invocation panicked");
                    first_panic.get_or_insert(payload);
                }
            }
            first_panic
        });

        if let Some(payload) = first_panic {
            panic::resume_unwind(payload);
        }
    }

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
