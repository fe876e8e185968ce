// src/system/mod.rs

//! Task systems: the four scheduling strategies behind one contract.
//!
//! - [`serial`] runs every invocation on the caller's thread.
//! - [`spawn`] starts one thread per invocation and joins them all.
//! - [`spinning`] keeps a fixed pool of workers that poll a shared queue.
//! - [`sleeping`] keeps a fixed pool of workers that sleep when idle and
//!   honours dependency edges between asynchronous launches.
//! - [`work_queue`] is the FIFO of invocations shared by both pools.
//! - [`panic_slot`] holds a panic captured on a worker until the caller can
//!   re-raise it.
//!
//! # Callback failures
//!
//! A panicking invocation never takes a worker down. The pool catches it,
//! counts the invocation as completed (so retirement, promotion and `wait`
//! still make progress) and re-raises the first captured panic on the
//! caller's thread from the next `submit` or `wait`. The serial strategy
//! simply lets the panic unwind; spawn-per-task joins every thread first and
//! then re-raises.

use std::sync::Arc;

use tracing::debug;

use crate::types::{LaunchId, StrategyKind};

pub mod panic_slot;
pub mod serial;
pub mod sleeping;
pub mod spawn;
pub mod spinning;
pub mod work_queue;

pub use serial::SerialSystem;
pub use sleeping::SleepingPool;
pub use spawn::SpawnSystem;
pub use spinning::SpinningPool;

/// The body of a launch: invoked once per index with `(index, total)`.
///
/// Implementations must tolerate concurrent invocation with different
/// indices. Any `Fn(usize, usize) + Send + Sync` closure is a `Runnable`.
pub trait Runnable: Send + Sync {
    fn run_task(&self, index: usize, total: usize);
}

impl<F> Runnable for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn run_task(&self, index: usize, total: usize) {
        self(index, total)
    }
}

/// Capability shared by every scheduling strategy.
pub trait TaskSystem: Send + Sync {
    /// Human-readable strategy name.
    fn name(&self) -> &'static str;

    /// Run `total` invocations of `runnable` and return once all of them
    /// finished.
    fn submit(&self, runnable: Arc<dyn Runnable>, total: usize);

    /// Register a launch that may only start once every launch in
    /// `prerequisites` has retired, and return its identifier without waiting.
    ///
    /// `prerequisites` must only contain identifiers previously returned by
    /// this task system. Anything else is a contract violation: the launch may
    /// never become ready and `wait` may block forever.
    fn submit_async(
        &self,
        runnable: Arc<dyn Runnable>,
        total: usize,
        prerequisites: &[LaunchId],
    ) -> LaunchId;

    /// Block until every launch submitted so far has retired.
    fn wait(&self);
}

/// Construct the task system for `kind` with `num_threads` workers.
///
/// `num_threads` is ignored by the serial and spawn-per-task strategies.
pub fn build_task_system(kind: StrategyKind, num_threads: usize) -> Box<dyn TaskSystem> {
    debug!(strategy = %kind, num_threads, "building task system");

    match kind {
        StrategyKind::Serial => Box::new(SerialSystem::new(num_threads)),
        StrategyKind::Spawn => Box::new(SpawnSystem::new(num_threads)),
        StrategyKind::Spinning => Box::new(SpinningPool::new(num_threads)),
        StrategyKind::Sleeping => Box::new(SleepingPool::new(num_threads)),
    }
}
