use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::dag::graph::DependencyGraph;
use crate::dag::launch_info::{LaunchInfo, LaunchRunState, LaunchState};
use crate::dag::scheduler_step::SchedulerStep;
use crate::errors::{Result, TaskSysError};
use crate::system::Runnable;
use crate::types::LaunchId;

/// Launch scheduler: the dependency graph plus per-launch completion state.
///
/// It is responsible for:
/// - handing out monotonically increasing launch identifiers
/// - deciding whether a newly registered launch is ready right away
/// - counting finished invocations per launch
/// - retiring a launch once *all* of its invocations finished
/// - promoting dependents whose last unmet prerequisite just retired
///
/// It has no threads, locks or queues of its own. The sleeping pool keeps it
/// behind its mutex and feeds the returned [`SchedulerStep`]s into the work
/// queue; tests drive it directly.
#[derive(Debug, Default)]
pub struct LaunchScheduler {
    graph: DependencyGraph,
    /// Outstanding (not yet retired) launches. Retired launches are removed.
    launches: HashMap<LaunchId, LaunchInfo>,
    /// Outstanding launches in the `Ready` state.
    ready: usize,
    next_id: LaunchId,
}

impl LaunchScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier the next registration will receive.
    pub fn next_id(&self) -> LaunchId {
        self.next_id
    }

    /// Returns `true` if no launch is outstanding.
    pub fn is_idle(&self) -> bool {
        self.launches.is_empty()
    }

    /// Number of launches that have not retired yet.
    pub fn outstanding(&self) -> usize {
        self.launches.len()
    }

    /// Whether `launch` was issued and has retired.
    pub fn is_retired(&self, launch: LaunchId) -> bool {
        launch < self.next_id && !self.launches.contains_key(&launch)
    }

    /// Read-only view of the given launch's state.
    pub fn run_state_of(&self, launch: LaunchId) -> LaunchRunState {
        if launch >= self.next_id {
            return LaunchRunState::Unknown;
        }
        self.launches.get(&launch).map(|info| info.state).into()
    }

    /// Invocations of `launch` that have not finished yet (0 once retired).
    pub fn remaining_of(&self, launch: LaunchId) -> usize {
        self.launches
            .get(&launch)
            .map(|info| info.remaining)
            .unwrap_or(0)
    }

    /// Prerequisites of `launch` that have not retired yet.
    pub fn unmet_prerequisites_of(&self, launch: LaunchId) -> Result<Vec<LaunchId>> {
        if launch >= self.next_id {
            return Err(TaskSysError::unknown_launch_id(launch));
        }
        Ok(self.graph.unmet_prerequisites_of(launch))
    }

    /// Launches currently waiting on `launch`.
    pub fn dependents_of(&self, launch: LaunchId) -> Vec<LaunchId> {
        self.graph.dependents_of(launch)
    }

    /// Launches are outstanding but none of them is ready.
    ///
    /// Nothing can make progress from here on: no invocation is queued or
    /// executing, so no retirement will ever promote the pending launches.
    /// This only happens after a contract violation (a cycle, or a
    /// prerequisite that is never submitted).
    pub fn is_stalled(&self) -> bool {
        !self.launches.is_empty() && self.ready == 0
    }

    /// Register a new launch of `total` invocations that waits on
    /// `prerequisites`.
    ///
    /// Prerequisites that already retired are dropped. If none is left the
    /// launch is ready immediately and shows up in `newly_ready` (or, with
    /// `total == 0`, in `newly_retired`).
    pub fn register(
        &mut self,
        runnable: Arc<dyn Runnable>,
        total: usize,
        prerequisites: &[LaunchId],
    ) -> (LaunchId, SchedulerStep) {
        let id = self.next_id;
        self.next_id += 1;

        let mut live = BTreeSet::new();
        for &prerequisite in prerequisites {
            if prerequisite >= id {
                warn!(
                    launch = id,
                    prerequisite,
                    "prerequisite has not been issued yet; launch may never become ready"
                );
                live.insert(prerequisite);
            } else if !self.is_retired(prerequisite) {
                live.insert(prerequisite);
            }
        }

        debug!(
            launch = id,
            total,
            unmet = live.len(),
            "scheduler: registered launch"
        );

        self.launches.insert(id, LaunchInfo::new(id, runnable, total));

        let mut step = SchedulerStep::default();

        if live.is_empty() {
            let mut to_retire = VecDeque::new();
            self.promote(id, &mut step, &mut to_retire);
            self.retire_all(to_retire, &mut step);
        } else {
            self.graph.add_launch(id, live);
        }

        step.became_idle = self.launches.is_empty();
        (id, step)
    }

    /// Record that one invocation of `launch` finished executing.
    ///
    /// The launch retires when this was its last outstanding invocation, and
    /// the retirement cascades to dependents.
    pub fn complete_invocation(&mut self, launch: LaunchId) -> SchedulerStep {
        let mut step = SchedulerStep::default();

        match self.launches.get_mut(&launch) {
            Some(info) if info.state == LaunchState::Ready && info.remaining > 0 => {
                info.remaining -= 1;
                if info.remaining == 0 {
                    self.retire_all(VecDeque::from([launch]), &mut step);
                }
            }
            Some(info) => {
                warn!(
                    launch,
                    state = ?info.state,
                    remaining = info.remaining,
                    "completion for launch that has nothing executing; ignoring"
                );
            }
            None => {
                warn!(launch, "completion for unknown or retired launch; ignoring");
            }
        }

        step.became_idle = self.launches.is_empty();
        step
    }

    /// Mark `launch` ready. Launches without invocations go straight to the
    /// retirement queue.
    fn promote(
        &mut self,
        launch: LaunchId,
        step: &mut SchedulerStep,
        to_retire: &mut VecDeque<LaunchId>,
    ) {
        if self.graph.is_blocked(launch) {
            warn!(launch, "promotion for launch with unmet prerequisites; ignoring");
            return;
        }
        let Some(info) = self.launches.get_mut(&launch) else {
            warn!(launch, "promotion for launch missing from launch map");
            return;
        };

        info.state = LaunchState::Ready;
        self.ready += 1;
        if info.total == 0 {
            debug!(launch, "scheduler: empty launch ready; retiring");
            to_retire.push_back(launch);
        } else {
            debug!(launch, total = info.total, "scheduler: launch ready");
            step.newly_ready.push(info.to_ready());
        }
    }

    /// Retire every queued launch, promoting the dependents each retirement
    /// unblocks (and retiring those too if they are empty).
    fn retire_all(&mut self, mut to_retire: VecDeque<LaunchId>, step: &mut SchedulerStep) {
        while let Some(launch) = to_retire.pop_front() {
            if self.launches.remove(&launch).is_some() {
                self.ready -= 1;
            }
            step.newly_retired.push(launch);

            let unblocked = self.graph.resolve(launch);
            debug!(
                launch,
                ?unblocked,
                outstanding = self.launches.len(),
                "scheduler: launch retired"
            );

            for dependent in unblocked {
                self.promote(dependent, step, &mut to_retire);
            }
        }
    }
}
