// src/system/spinning.rs

//! Persistent pool whose workers busy-poll a shared queue.
//!
//! Nothing here ever blocks on a condition variable: idle workers and the
//! submitting caller both yield the processor and retry. Only one launch is
//! outstanding at a time, so `submit_async` is just `submit`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, trace, warn};

use crate::dag::ReadyLaunch;
use crate::system::panic_slot::{PanicSlot, resume_if_panicked, run_trapped};
use crate::system::work_queue::WorkQueue;
use crate::system::{Runnable, TaskSystem};
use crate::types::LaunchId;

#[derive(Debug, Default)]
struct SpinState {
    queue: WorkQueue,
    /// Invocations of the current launch that have not finished yet.
    remaining: usize,
    panic: PanicSlot,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<SpinState>,
    shutdown: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SpinState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
pub struct SpinningPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    /// Serializes callers so that at most one launch is in the queue.
    submit_lock: Mutex<()>,
}

impl SpinningPool {
    /// Start `num_threads` polling workers (at least one).
    pub fn new(num_threads: usize) -> Self {
        if num_threads == 0 {
            warn!("spinning pool requested with 0 threads; using 1");
        }
        let num_threads = num_threads.max(1);
        let shared = Arc::new(Shared::default());

        let workers = (0..num_threads)
            .map(|worker_index| {
                let shared = Arc::clone(&shared);
                thread::Builder::new()
                    .name(format!("tasksys-spinning-w{worker_index}"))
                    .spawn(move || {
                        debug!(worker_index, "spinning worker started");
                        worker_loop(&shared);
                        debug!(worker_index, "spinning worker exiting");
                    })
                    .expect("failed to spawn spinning pool worker thread")
            })
            .collect();

        Self {
            shared,
            workers,
            submit_lock: Mutex::new(()),
        }
    }

    pub fn num_threads(&self) -> usize {
        self.workers.len()
    }
}

fn worker_loop(shared: &Shared) {
    while !shared.shutdown.load(Ordering::Acquire) {
        let next = shared.lock().queue.pop();

        match next {
            Some(invocation) => {
                trace!(index = invocation.index, "spinning: running invocation");
                let outcome = run_trapped(&invocation);

                let mut state = shared.lock();
                if let Err(payload) = outcome {
                    state.panic.record(payload);
                }
                state.remaining -= 1;
            }
            None => thread::yield_now(),
        }
    }
}

impl TaskSystem for SpinningPool {
    fn name(&self) -> &'static str {
        "Parallel + Thread Pool + Spin"
    }

    fn submit(&self, runnable: Arc<dyn Runnable>, total: usize) {
        if total == 0 {
            return;
        }

        let _exclusive = self
            .submit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        {
            let mut state = self.shared.lock();
            state.remaining = total;
            state.queue.push_launch(ReadyLaunch {
                id: 0,
                runnable,
                total,
            });
        }

        // Workers are always polling; nothing to notify.
        let payload = loop {
            {
                let mut state = self.shared.lock();
                if state.remaining == 0 {
                    break state.panic.take();
                }
            }
            thread::yield_now();
        };

        resume_if_panicked(payload);
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

impl Drop for SpinningPool {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("spinning pool worker panicked outside of an invocation");
            }
        }

        if !self.shared.lock().panic.is_empty() {
            error!("spinning pool dropped with an invocation panic that was never re-raised");
        }
    }
}
