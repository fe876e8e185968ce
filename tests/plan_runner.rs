// tests/plan_runner.rs

mod common;
use crate::common::builders::{LaunchBuilder, PlanBuilder};
use crate::common::{TEST_TIMEOUT, init_tracing, with_timeout};

use tasksys::config::PlanFile;
use tasksys::engine::{LaunchProbe, PlanRunner};
use tasksys::system::SerialSystem;
use tasksys::{Runnable, StrategyKind, run_plan};

fn diamond_plan(strategy: StrategyKind) -> PlanFile {
    PlanBuilder::new()
        .strategy(strategy)
        .threads(4)
        .with_launch("A", LaunchBuilder::new(8).work(2_000).build())
        .with_launch("B", LaunchBuilder::new(16).work(500).after("A").build())
        .with_launch("C", LaunchBuilder::new(4).work(5_000).after("A").build())
        .with_launch("D", LaunchBuilder::new(8).after("B").after("C").build())
        .with_launch("solo", LaunchBuilder::new(32).build())
        .with_launch("empty", LaunchBuilder::new(0).after("solo").build())
        .build()
}

#[test]
fn test_diamond_plan_is_clean_on_every_strategy() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        for strategy in StrategyKind::ALL {
            let plan = diamond_plan(strategy);
            let reports = run_plan(&plan, 3);

            assert_eq!(reports.len(), 3);
            for report in &reports {
                assert!(report.is_clean(), "{strategy}:\n{report}");
                assert_eq!(report.total_executed(), plan.total_invocations());
                assert_eq!(report.launches.len(), 6);
            }
        }
    });
}

#[test]
fn test_sleeping_plan_reports_distinct_launch_ids() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let reports = run_plan(&diamond_plan(StrategyKind::Sleeping), 1);
        let report = &reports[0];

        let mut ids: Vec<_> = report.launches.iter().map(|l| l.launch_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);

        let a = report.launch("A").unwrap();
        let d = report.launch("D").unwrap();
        assert!(a.launch_id < d.launch_id);
        assert_eq!(report.strategy, "Parallel + Thread Pool + Sleep");
    });
}

#[test]
fn test_report_display_lists_every_launch() {
    let system = SerialSystem::new(1);
    let plan = diamond_plan(StrategyKind::Serial);
    let report = PlanRunner::new(&system).run(&plan);

    let text = report.to_string();
    assert!(text.starts_with("[Serial] 6 launches, 68 invocations"));
    for name in ["A", "B", "C", "D", "solo", "empty"] {
        assert!(text.contains(&format!("  - {name} (id 0)")), "{text}");
    }
    assert!(!text.contains("FAILED"));
}

#[test]
fn test_probe_flags_duplicates_missing_and_early_starts() {
    let prerequisite = std::sync::Arc::new(LaunchProbe::new("pre", 2, 0, Vec::new()));
    let probe = LaunchProbe::new("probe", 3, 0, vec![prerequisite.clone()]);

    // Prerequisite has not run at all yet.
    probe.run_task(0, 3);
    prerequisite.run_task(0, 2);
    prerequisite.run_task(1, 2);
    probe.run_task(0, 3);
    probe.run_task(7, 3);

    assert!(prerequisite.is_finished());
    assert_eq!(probe.ordering_violations(), 1);
    assert_eq!(probe.duplicated_indices(), vec![0]);
    assert_eq!(probe.missing_indices(), vec![1, 2]);
    assert_eq!(probe.out_of_range(), 1);
    assert!(!probe.is_finished());
}
