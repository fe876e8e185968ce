// tests/sleeping_dependencies.rs

//! Dependency-aware sleeping pool: ordering, retirement, wait and teardown.

mod common;
use crate::common::{EventLog, TEST_TIMEOUT, init_tracing, with_timeout};

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tasksys::TaskSystem;
use tasksys::dag::LaunchRunState;
use tasksys::system::SleepingPool;

#[test]
fn test_launch_ids_are_monotonic_and_never_reused() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let pool = SleepingPool::new(2);
        let log = EventLog::new();

        let ids: Vec<_> = (0..5)
            .map(|i| pool.submit_async(log.runnable(&format!("L{i}")), 1, &[]))
            .collect();
        pool.wait();
        let later = pool.submit_async(log.runnable("later"), 1, &[]);
        pool.wait();

        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(later, 5);
    });
}

#[test]
fn test_diamond_dependency() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        for round in 0..25 {
            let pool = SleepingPool::new(4);
            let log = EventLog::new();

            // Alternate which branch is slow so either can be the last to retire.
            let (b_delay, c_delay) = if round % 2 == 0 {
                (Duration::from_millis(2), Duration::ZERO)
            } else {
                (Duration::ZERO, Duration::from_millis(2))
            };

            let a = pool.submit_async(log.runnable("A"), 4, &[]);
            let b = pool.submit_async(log.slow_runnable("B", b_delay), 4, &[a]);
            let c = pool.submit_async(log.slow_runnable("C", c_delay), 4, &[a]);
            pool.submit_async(log.runnable("D"), 4, &[b, c]);
            pool.wait();

            assert_eq!(log.len(), 16);
            assert!(log.all_finished_before("A", "B"));
            assert!(log.all_finished_before("A", "C"));
            assert!(log.all_finished_before("B", "D"), "round {round}: D ran before B retired");
            assert!(log.all_finished_before("C", "D"), "round {round}: D ran before C retired");
        }
    });
}

/// A launch must retire only after all of its invocations finished, not after
/// the first one.
#[test]
fn test_multi_invocation_launch_fully_retires_before_dependent() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let pool = SleepingPool::new(4);
        let log = EventLog::new();

        let a = pool.submit_async(log.slow_runnable("A", Duration::from_millis(5)), 8, &[]);
        let b = pool.submit_async(log.runnable("B"), 8, &[a]);
        pool.wait();

        assert_eq!(log.indices_for("A"), (0..8).collect::<Vec<_>>());
        assert_eq!(log.indices_for("B"), (0..8).collect::<Vec<_>>());
        assert!(
            log.all_finished_before("A", "B"),
            "dependent started after only part of its prerequisite finished"
        );
        assert_eq!(pool.launch_state(a), LaunchRunState::Retired);
        assert_eq!(pool.launch_state(b), LaunchRunState::Retired);
    });
}

#[test]
fn test_stress_thousand_independent_launches() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let pool = SleepingPool::new(4);
        let log = EventLog::new();

        for i in 0..1000 {
            pool.submit_async(log.runnable(&format!("L{i}")), 1, &[]);
        }
        pool.wait();

        let counts = log.counts_by_tag();
        assert_eq!(counts.len(), 1000);
        assert!(counts.values().all(|&c| c == 1), "duplicate or missing launch");
        assert_eq!(pool.outstanding_launches(), 0);
    });
}

#[test]
fn test_long_chain_runs_in_order() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let pool = SleepingPool::new(4);
        let log = EventLog::new();

        let mut previous = None;
        for i in 0..50 {
            let deps: Vec<_> = previous.into_iter().collect();
            previous = Some(pool.submit_async(log.runnable(&format!("L{i}")), 3, &deps));
        }
        pool.wait();

        for i in 1..50 {
            assert!(log.all_finished_before(&format!("L{}", i - 1), &format!("L{i}")));
        }
    });
}

#[test]
fn test_prerequisite_already_retired_is_ignored() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let pool = SleepingPool::new(2);
        let log = EventLog::new();

        let a = pool.submit_async(log.runnable("A"), 2, &[]);
        pool.wait();
        assert_eq!(pool.launch_state(a), LaunchRunState::Retired);

        pool.submit_async(log.runnable("B"), 2, &[a]);
        pool.wait();
        assert_eq!(log.indices_for("B"), vec![0, 1]);
    });
}

#[test]
fn test_empty_launch_in_the_middle_of_a_chain() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let pool = SleepingPool::new(3);
        let log = EventLog::new();

        let a = pool.submit_async(log.slow_runnable("A", Duration::from_millis(2)), 4, &[]);
        let empty = pool.submit_async(log.runnable("empty"), 0, &[a]);
        pool.submit_async(log.runnable("C"), 4, &[empty]);
        pool.wait();

        assert!(log.indices_for("empty").is_empty());
        assert!(log.all_finished_before("A", "C"));
        assert_eq!(pool.outstanding_launches(), 0);
    });
}

#[test]
fn test_duplicate_prerequisites_are_harmless() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let pool = SleepingPool::new(2);
        let log = EventLog::new();

        let a = pool.submit_async(log.runnable("A"), 3, &[]);
        pool.submit_async(log.runnable("B"), 3, &[a, a, a]);
        pool.wait();

        assert_eq!(log.len(), 6);
        assert!(log.all_finished_before("A", "B"));
    });
}

#[test]
fn test_wait_from_several_threads() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let pool = Arc::new(SleepingPool::new(4));
        let log = EventLog::new();

        let a = pool.submit_async(log.slow_runnable("A", Duration::from_millis(1)), 16, &[]);
        pool.submit_async(log.runnable("B"), 16, &[a]);

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || pool.wait())
            })
            .collect();
        for waiter in waiters {
            waiter.join().unwrap();
        }

        assert_eq!(log.len(), 32);
    });
}

#[test]
fn test_pending_launch_waits_for_unfinished_prerequisite() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let pool = SleepingPool::new(2);
        let log = EventLog::new();

        let a = pool.submit_async(log.slow_runnable("A", Duration::from_millis(50)), 1, &[]);
        let b = pool.submit_async(log.runnable("B"), 1, &[a]);

        // A is still sleeping, so B cannot have been promoted yet.
        assert_eq!(pool.launch_state(b), LaunchRunState::Pending);

        pool.wait();
        assert_eq!(pool.launch_state(b), LaunchRunState::Retired);
    });
}

#[test]
fn test_teardown_without_work_is_prompt() {
    init_tracing();

    with_timeout(Duration::from_secs(5), || {
        let started = Instant::now();
        for _ in 0..20 {
            let pool = SleepingPool::new(8);
            assert_eq!(pool.num_threads(), 8);
            drop(pool);
        }
        assert!(started.elapsed() < Duration::from_secs(5));
    });
}

#[test]
fn test_zero_threads_is_clamped_to_one() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let pool = SleepingPool::new(0);
        assert_eq!(pool.num_threads(), 1);

        let log = EventLog::new();
        pool.submit(log.runnable("A"), 5);
        assert_eq!(log.len(), 5);
    });
}

#[test]
fn test_drop_drains_ready_and_promoted_work() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let log = EventLog::new();
        {
            let pool = SleepingPool::new(2);
            let a = pool.submit_async(log.slow_runnable("A", Duration::from_millis(2)), 6, &[]);
            pool.submit_async(log.runnable("B"), 6, &[a]);
            // No wait(): drop must still run everything that can become ready.
        }

        assert_eq!(log.len(), 12);
        assert!(log.all_finished_before("A", "B"));
    });
}

#[test]
fn test_dangling_prerequisite_stalls_without_blocking_teardown() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let pool = SleepingPool::new(2);
        let log = EventLog::new();

        // Identifier 100 is never issued: the launch can never become ready.
        let stuck = pool.submit_async(log.runnable("stuck"), 3, &[100]);

        assert_eq!(pool.launch_state(stuck), LaunchRunState::Pending);
        assert_eq!(pool.outstanding_launches(), 1);
        assert_eq!(pool.launch_state(100), LaunchRunState::Unknown);

        drop(pool);
        assert!(log.is_empty());
    });
}

#[test]
fn test_wait_resumes_once_forward_prerequisite_is_submitted() {
    init_tracing();

    with_timeout(TEST_TIMEOUT, || {
        let pool = Arc::new(SleepingPool::new(2));
        let log = EventLog::new();

        // B waits on identifier 1, which is only handed out below.
        let b = pool.submit_async(log.runnable("B"), 4, &[1]);
        assert_eq!(b, 0);

        let waiter = {
            let pool = Arc::clone(&pool);
            thread::spawn(move || pool.wait())
        };

        // Let the waiter observe the stalled graph first.
        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());
        assert_eq!(pool.launch_state(b), LaunchRunState::Pending);

        let a = pool.submit_async(log.runnable("A"), 4, &[]);
        assert_eq!(a, 1);

        waiter.join().unwrap();

        assert_eq!(log.len(), 8);
        assert!(log.all_finished_before("A", "B"));
        assert_eq!(pool.launch_state(b), LaunchRunState::Retired);
        assert_eq!(pool.outstanding_launches(), 0);
    });
}
