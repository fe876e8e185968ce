#![allow(dead_code)]
#![allow(unused_imports)]

pub use tasksys_test_utils::builders;
pub use tasksys_test_utils::recording::{EventLog, Record, RecordingRunnable};
pub use tasksys_test_utils::{TEST_TIMEOUT, init_tracing, with_timeout};

use tasksys::{StrategyKind, TaskSystem, build_task_system};

/// One task system per strategy, each with `num_threads` workers.
pub fn all_systems(num_threads: usize) -> Vec<(StrategyKind, Box<dyn TaskSystem>)> {
    StrategyKind::ALL
        .iter()
        .map(|&kind| (kind, build_task_system(kind, num_threads)))
        .collect()
}
