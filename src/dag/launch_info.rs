// src/dag/launch_info.rs

//! Launch metadata and lifecycle state.

use std::fmt;
use std::sync::Arc;

use crate::system::Runnable;
use crate::types::LaunchId;

/// Lifecycle state of an outstanding launch (internal).
///
/// Retired launches are removed from the scheduler entirely, so there is no
/// `Retired` variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    /// Registered, waiting on at least one prerequisite.
    Pending,
    /// All prerequisites retired; invocations are queued or executing.
    Ready,
}

/// Public, read-only view of a launch's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchRunState {
    /// The identifier has not been issued by this scheduler.
    Unknown,
    Pending,
    Ready,
    /// Every invocation finished.
    Retired,
}

impl From<Option<LaunchState>> for LaunchRunState {
    fn from(state: Option<LaunchState>) -> Self {
        match state {
            None => LaunchRunState::Retired,
            Some(LaunchState::Pending) => LaunchRunState::Pending,
            Some(LaunchState::Ready) => LaunchRunState::Ready,
        }
    }
}

/// Book-keeping for one outstanding launch.
pub struct LaunchInfo {
    pub id: LaunchId,
    pub runnable: Arc<dyn Runnable>,
    pub total: usize,
    /// Invocations that have not finished executing yet.
    pub remaining: usize,
    pub state: LaunchState,
}

impl LaunchInfo {
    pub fn new(id: LaunchId, runnable: Arc<dyn Runnable>, total: usize) -> Self {
        Self {
            id,
            runnable,
            total,
            remaining: total,
            state: LaunchState::Pending,
        }
    }

    /// Handle describing this launch's invocations for the work queue.
    pub fn to_ready(&self) -> ReadyLaunch {
        ReadyLaunch {
            id: self.id,
            runnable: Arc::clone(&self.runnable),
            total: self.total,
        }
    }
}

impl fmt::Debug for LaunchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchInfo")
            .field("id", &self.id)
            .field("total", &self.total)
            .field("remaining", &self.remaining)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// A launch whose prerequisites have all retired and whose invocations may
/// now be handed to workers.
#[derive(Clone)]
pub struct ReadyLaunch {
    pub id: LaunchId,
    pub runnable: Arc<dyn Runnable>,
    pub total: usize,
}

impl fmt::Debug for ReadyLaunch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadyLaunch")
            .field("id", &self.id)
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}
