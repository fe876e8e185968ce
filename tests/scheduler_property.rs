// tests/scheduler_property.rs

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use proptest::prelude::*;
use tasksys::dag::{LaunchScheduler, SchedulerStep};
use tasksys::{LaunchId, Runnable};

/// A generated launch: invocation count plus prerequisite picks.
#[derive(Debug, Clone)]
struct LaunchSpec {
    total: usize,
    prerequisites: Vec<LaunchId>,
}

// Strategy to generate an acyclic launch graph.
// Launch N may only depend on launches 0..N, which is also what the
// submission API allows.
fn launch_graph_strategy(max_launches: usize) -> impl Strategy<Value = Vec<LaunchSpec>> {
    (1..=max_launches).prop_flat_map(|num_launches| {
        proptest::collection::vec(
            (0..4usize, proptest::collection::vec(any::<u64>(), 0..4)),
            num_launches,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (total, picks))| {
                    let prerequisites = if i == 0 {
                        Vec::new()
                    } else {
                        picks.into_iter().map(|p| p % i as u64).collect()
                    };
                    LaunchSpec { total, prerequisites }
                })
                .collect()
        })
    })
}

fn noop() -> Arc<dyn Runnable> {
    Arc::new(|_index: usize, _total: usize| {})
}

/// Bookkeeping of what the simulated workers observed.
#[derive(Default)]
struct Observed {
    retired: HashSet<LaunchId>,
    promoted: HashSet<LaunchId>,
    completed: HashMap<LaunchId, usize>,
    /// Invocations handed out and not yet completed.
    executing: Vec<LaunchId>,
}

impl Observed {
    fn absorb(
        &mut self,
        step: SchedulerStep,
        specs: &[LaunchSpec],
    ) -> Result<(), TestCaseError> {
        for launch in step.newly_retired {
            let spec = &specs[launch as usize];
            prop_assert_eq!(
                self.completed.get(&launch).copied().unwrap_or(0),
                spec.total,
                "launch {} retired before all invocations completed",
                launch
            );
            prop_assert!(self.retired.insert(launch), "launch {} retired twice", launch);
        }

        for ready in step.newly_ready {
            prop_assert!(self.promoted.insert(ready.id), "launch {} promoted twice", ready.id);
            for prerequisite in &specs[ready.id as usize].prerequisites {
                prop_assert!(
                    self.retired.contains(prerequisite),
                    "launch {} ready before prerequisite {} retired",
                    ready.id,
                    prerequisite
                );
            }
            for _ in 0..ready.total {
                self.executing.push(ready.id);
            }
        }

        Ok(())
    }
}

proptest! {
    #[test]
    fn test_scheduler_retires_everything_in_dependency_order(
        specs in launch_graph_strategy(12),
        picks in proptest::collection::vec(any::<usize>(), 0..200),
    ) {
        let mut scheduler = LaunchScheduler::new();
        let mut observed = Observed::default();
        let mut picks = picks.into_iter();
        let mut next_to_register = 0;

        // Interleave registrations and completions according to `picks`,
        // then drain whatever is still executing.
        loop {
            let pick = picks.next();
            let can_register = next_to_register < specs.len();
            let register = match (can_register, observed.executing.is_empty()) {
                (false, true) => break,
                (true, true) => true,
                (false, false) => false,
                (true, false) => pick.map(|p| p % 2 == 0).unwrap_or(true),
            };

            if register {
                let spec = &specs[next_to_register];
                let (id, step) = scheduler.register(noop(), spec.total, &spec.prerequisites);
                prop_assert_eq!(id, next_to_register as LaunchId);
                next_to_register += 1;
                observed.absorb(step, &specs)?;
            } else {
                let slot = pick.unwrap_or(0) % observed.executing.len();
                let launch = observed.executing.swap_remove(slot);
                *observed.completed.entry(launch).or_insert(0) += 1;
                let step = scheduler.complete_invocation(launch);
                observed.absorb(step, &specs)?;
            }
        }

        prop_assert!(scheduler.is_idle(), "{} launches never retired", scheduler.outstanding());
        prop_assert_eq!(observed.retired.len(), specs.len());
        prop_assert!(!scheduler.is_stalled());
    }
}
