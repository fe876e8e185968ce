// src/engine/runner.rs

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::PlanFile;
use crate::engine::report::{LaunchReport, RunReport};
use crate::engine::workload::LaunchProbe;
use crate::system::TaskSystem;
use crate::types::LaunchId;

/// Drives a [`PlanFile`] through a [`TaskSystem`].
///
/// Launches are submitted asynchronously in dependency order, each with the
/// identifiers of its `after` launches as prerequisites, and then the runner
/// waits for all of them. Strategies without asynchronous launches run each
/// launch to completion inside `submit_async`, which still respects the
/// order because submission is topological.
pub struct PlanRunner<'a> {
    system: &'a dyn TaskSystem,
}

impl fmt::Debug for PlanRunner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanRunner")
            .field("system", &self.system.name())
            .finish()
    }
}

impl<'a> PlanRunner<'a> {
    pub fn new(system: &'a dyn TaskSystem) -> Self {
        Self { system }
    }

    /// Submit every launch of `plan`, wait for all of them, and report.
    pub fn run(&self, plan: &PlanFile) -> RunReport {
        let order = plan.submission_order();
        info!(
            strategy = self.system.name(),
            launches = order.len(),
            invocations = plan.total_invocations(),
            "running plan"
        );

        let mut probes: HashMap<&str, Arc<LaunchProbe>> = HashMap::new();
        let mut ids: HashMap<&str, LaunchId> = HashMap::new();
        let mut submitted: Vec<(&str, LaunchId)> = Vec::with_capacity(order.len());

        let start = Instant::now();

        for name in order {
            let Some(cfg) = plan.launch.get(name) else {
                continue;
            };

            let prerequisites: Vec<LaunchId> =
                cfg.after.iter().filter_map(|dep| ids.get(dep.as_str()).copied()).collect();
            let prerequisite_probes: Vec<Arc<LaunchProbe>> = cfg
                .after
                .iter()
                .filter_map(|dep| probes.get(dep.as_str()).cloned())
                .collect();

            let probe = Arc::new(LaunchProbe::new(
                name,
                cfg.tasks,
                cfg.work,
                prerequisite_probes,
            ));

            let id = self
                .system
                .submit_async(probe.clone(), cfg.tasks, &prerequisites);
            debug!(launch = %name, id, tasks = cfg.tasks, ?prerequisites, "submitted launch");

            probes.insert(name, probe);
            ids.insert(name, id);
            submitted.push((name, id));
        }

        self.system.wait();
        let elapsed = start.elapsed();

        let launches = submitted
            .into_iter()
            .filter_map(|(name, id)| {
                probes
                    .get(name)
                    .map(|probe| LaunchReport::from_probe(id, probe))
            })
            .collect();

        let report = RunReport {
            strategy: self.system.name(),
            elapsed,
            launches,
        };

        info!(
            strategy = report.strategy,
            elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
            clean = report.is_clean(),
            "plan finished"
        );

        report
    }
}
