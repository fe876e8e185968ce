#![allow(dead_code)]

use std::collections::BTreeMap;

use tasksys::StrategyKind;
use tasksys::config::{LaunchConfig, PlanFile, PlanSection, RawPlanFile};

/// Builder for `PlanFile` to simplify test setup.
pub struct PlanBuilder {
    plan: RawPlanFile,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self {
            plan: RawPlanFile {
                config: PlanSection::default(),
                launch: BTreeMap::new(),
            },
        }
    }

    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.plan.config.strategy = strategy;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.plan.config.threads = threads;
        self
    }

    pub fn with_launch(mut self, name: &str, launch: LaunchConfig) -> Self {
        self.plan.launch.insert(name.to_string(), launch);
        self
    }

    pub fn raw(self) -> RawPlanFile {
        self.plan
    }

    pub fn try_build(self) -> tasksys::errors::Result<PlanFile> {
        PlanFile::try_from(self.plan)
    }

    pub fn build(self) -> PlanFile {
        self.try_build()
            .expect("Failed to build valid plan from builder")
    }
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `LaunchConfig`.
pub struct LaunchBuilder {
    launch: LaunchConfig,
}

impl LaunchBuilder {
    pub fn new(tasks: usize) -> Self {
        Self {
            launch: LaunchConfig {
                tasks,
                work: 0,
                after: vec![],
            },
        }
    }

    pub fn work(mut self, work: u64) -> Self {
        self.launch.work = work;
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.launch.after.push(dep.to_string());
        self
    }

    pub fn build(self) -> LaunchConfig {
        self.launch
    }
}
