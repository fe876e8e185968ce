// src/system/sleeping.rs

//! Dependency-aware pool whose idle workers sleep on a condition variable.
//!
//! All scheduling state (launch scheduler, work queue, captured panic,
//! shutdown flag) lives in one [`PoolState`] behind one mutex. Callbacks run
//! outside the lock. Two condition variables sit on top of it:
//!
//! - `work_available` wakes workers when invocations are queued or shutdown
//!   is requested.
//! - `all_retired` wakes `wait()` callers when the last outstanding launch
//!   retires (and when the graph stalls, so the stall gets reported).
//!
//! Retirement is driven by per-launch remaining counts: a launch retires only
//! after every one of its invocations has finished, and its dependents are
//! promoted in the same critical section as the final decrement.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, trace, warn};

use crate::dag::{LaunchRunState, LaunchScheduler, SchedulerStep};
use crate::system::panic_slot::{PanicSlot, resume_if_panicked, run_trapped};
use crate::system::work_queue::WorkQueue;
use crate::system::{Runnable, TaskSystem};
use crate::types::LaunchId;

#[derive(Debug, Default)]
struct PoolState {
    scheduler: LaunchScheduler,
    work_queue: WorkQueue,
    /// Invocations dequeued by a worker and not finished yet.
    executing: usize,
    panic: PanicSlot,
    shutdown: bool,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<PoolState>,
    work_available: Condvar,
    all_retired: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish the outcome of a scheduler step. Must be called with the lock
    /// held, in the same critical section as the mutation that produced it.
    fn apply(&self, state: &mut PoolState, step: SchedulerStep) {
        if !step.newly_ready.is_empty() {
            for launch in step.newly_ready {
                state.work_queue.push_launch(launch);
            }
            self.work_available.notify_all();
        }

        if step.became_idle || state.scheduler.is_stalled() {
            self.all_retired.notify_all();
        }
    }
}

/// Persistent worker pool with asynchronous, dependency-ordered launches.
///
/// # Teardown
///
/// Dropping the pool drains work that is already ready (including launches
/// promoted while draining), then joins every worker. Launches still waiting
/// on a prerequisite that can never retire are abandoned. Call
/// [`TaskSystem::wait`] first to be sure everything ran.
#[derive(Debug)]
pub struct SleepingPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl SleepingPool {
    /// Start `num_threads` sleeping workers (at least one).
    pub fn new(num_threads: usize) -> Self {
        if num_threads == 0 {
            warn!("sleeping pool requested with 0 threads; using 1");
        }
        let num_threads = num_threads.max(1);
        let shared = Arc::new(Shared::default());

        let workers = (0..num_threads)
            .map(|worker_index| {
                let shared = Arc::clone(&shared);
                thread::Builder::new()
                    .name(format!("tasksys-sleeping-w{worker_index}"))
                    .spawn(move || {
                        debug!(worker_index, "sleeping worker started");
                        worker_loop(&shared);
                        debug!(worker_index, "sleeping worker exiting");
                    })
                    .expect("failed to spawn sleeping pool worker thread")
            })
            .collect();

        Self { shared, workers }
    }

    pub fn num_threads(&self) -> usize {
        self.workers.len()
    }

    /// Launches submitted and not yet retired.
    pub fn outstanding_launches(&self) -> usize {
        self.shared.lock().scheduler.outstanding()
    }

    /// Current lifecycle state of `launch`.
    pub fn launch_state(&self, launch: LaunchId) -> LaunchRunState {
        self.shared.lock().scheduler.run_state_of(launch)
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let invocation = {
            let mut state = shared.lock();
            loop {
                // Ready work is drained even after shutdown was requested.
                if let Some(invocation) = state.work_queue.pop() {
                    state.executing += 1;
                    break invocation;
                }
                if state.shutdown {
                    return;
                }
                state = shared
                    .work_available
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };

        trace!(
            launch = invocation.launch,
            index = invocation.index,
            "sleeping: running invocation"
        );
        let outcome = run_trapped(&invocation);

        let mut state = shared.lock();
        state.executing -= 1;
        if let Err(payload) = outcome {
            state.panic.record(payload);
        }
        let step = state.scheduler.complete_invocation(invocation.launch);
        shared.apply(&mut state, step);
    }
}

impl TaskSystem for SleepingPool {
    fn name(&self) -> &'static str {
        "Parallel + Thread Pool + Sleep"
    }

    fn submit(&self, runnable: Arc<dyn Runnable>, total: usize) {
        self.submit_async(runnable, total, &[]);
        self.wait();
    }

    fn submit_async(
        &self,
        runnable: Arc<dyn Runnable>,
        total: usize,
        prerequisites: &[LaunchId],
    ) -> LaunchId {
        let mut state = self.shared.lock();
        let (launch, step) = state.scheduler.register(runnable, total, prerequisites);
        self.shared.apply(&mut state, step);
        launch
    }

    fn wait(&self) {
        let mut state = self.shared.lock();
        let mut stall_reported = false;

        while !state.scheduler.is_idle() {
            if !stall_reported && state.scheduler.is_stalled() {
                error!(
                    outstanding = state.scheduler.outstanding(),
                    queued = state.work_queue.len(),
                    executing = state.executing,
                    "wait: no launch can become ready (dependency cycle or prerequisite never submitted); still waiting"
                );
                stall_reported = true;
            }
            state = self
                .shared
                .all_retired
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        let payload = state.panic.take();
        drop(state);
        resume_if_panicked(payload);
    }
}

impl Drop for SleepingPool {
    fn drop(&mut self) {
        {
            let mut state = self.shared.lock();
            state.shutdown = true;
            if !state.scheduler.is_idle() {
                warn!(
                    outstanding = state.scheduler.outstanding(),
                    queued = state.work_queue.len(),
                    executing = state.executing,
                    "dropping sleeping pool with outstanding launches; draining ready work"
                );
            }
        }
        self.shared.work_available.notify_all();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("sleeping pool worker panicked outside of an invocation");
            }
        }

        let state = self.shared.lock();
        if !state.scheduler.is_idle() {
            warn!(
                abandoned = state.scheduler.outstanding(),
                "sleeping pool shut down with launches that never became ready"
            );
        }
        if !state.panic.is_empty() {
            error!("sleeping pool dropped with an invocation panic that was never re-raised");
        }
    }
}
