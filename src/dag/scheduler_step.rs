// src/dag/scheduler_step.rs

//! Step-by-step result types for the launch scheduler.

use crate::dag::launch_info::ReadyLaunch;
use crate::types::LaunchId;

/// Structured result of a single scheduler mutation.
///
/// The sleeping pool turns `newly_ready` into queued work and uses
/// `became_idle` to wake `wait()` callers; tests use it to step the graph by
/// hand.
#[derive(Debug, Clone, Default)]
pub struct SchedulerStep {
    /// Launches promoted to ready by this step, in FIFO order. Launches with
    /// zero invocations never appear here; they retire on promotion.
    pub newly_ready: Vec<ReadyLaunch>,
    /// Launches retired by this step, in retirement order.
    pub newly_retired: Vec<LaunchId>,
    /// Whether this step left no outstanding launch behind.
    pub became_idle: bool,
}

impl SchedulerStep {
    /// Identifiers of the newly ready launches.
    pub fn ready_ids(&self) -> Vec<LaunchId> {
        self.newly_ready.iter().map(|launch| launch.id).collect()
    }
}
