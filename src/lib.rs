// src/lib.rs

//! Bulk task launches scheduled onto worker pools, with dependency edges
//! between launches.
//!
//! The library surface is the [`TaskSystem`] trait and its four strategies in
//! [`system`]; [`dag`] holds the pure launch-graph state machine the
//! dependency-aware pool is built on. [`config`], [`engine`], [`cli`] and
//! [`logging`] make up the `tasksys` plan runner binary.

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod system;
pub mod types;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::PlanFile;
use crate::config::loader::load_and_validate;
use crate::engine::{PlanRunner, RunReport};

pub use crate::system::{Runnable, TaskSystem, build_task_system};
pub use crate::types::{LaunchId, StrategyKind};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - plan loading and validation
/// - CLI overrides for strategy and thread count
/// - task system construction
/// - running the plan `--repeat` times and printing each report
pub fn run(args: CliArgs) -> Result<()> {
    let plan_path = PathBuf::from(&args.plan);
    let mut plan = load_and_validate(&plan_path)
        .with_context(|| format!("loading plan from {:?}", plan_path))?;

    if let Some(strategy) = args.strategy {
        plan.config.strategy = strategy;
    }
    if let Some(threads) = args.threads {
        if threads == 0 {
            bail!("--threads must be >= 1 (got 0)");
        }
        plan.config.threads = threads;
    }

    if args.dry_run {
        print_dry_run(&plan);
        return Ok(());
    }

    let reports = run_plan(&plan, args.repeat.max(1));
    let mut failed = 0;
    for report in &reports {
        print!("{report}");
        if !report.is_clean() {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} plan runs were not clean", reports.len());
    }
    Ok(())
}

/// Build the plan's task system once and run the plan `repeat` times on it.
pub fn run_plan(plan: &PlanFile, repeat: usize) -> Vec<RunReport> {
    let system = build_task_system(plan.config.strategy, plan.config.threads);
    info!(
        strategy = system.name(),
        threads = plan.config.threads,
        asynchronous = plan.config.strategy.supports_async(),
        repeat,
        "task system ready"
    );

    let runner = PlanRunner::new(system.as_ref());
    (0..repeat).map(|_| runner.run(plan)).collect()
}

/// Simple dry-run output: print settings and launches in submission order.
fn print_dry_run(plan: &PlanFile) {
    println!("tasksys dry-run");
    println!("  config.strategy = {}", plan.config.strategy);
    println!("  config.threads = {}", plan.config.threads);
    println!();

    println!("launches ({}), in submission order:", plan.launch.len());
    for name in plan.submission_order() {
        let Some(launch) = plan.launch.get(name) else {
            continue;
        };
        println!("  - {name}");
        println!("      tasks: {}", launch.tasks);
        if launch.work > 0 {
            println!("      work: {}", launch.work);
        }
        if !launch.after.is_empty() {
            println!("      after: {:?}", launch.after);
        }
    }

    debug!("dry-run complete (no execution)");
}
