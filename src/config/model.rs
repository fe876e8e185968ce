// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::StrategyKind;

/// Plan file as read from TOML, before semantic validation.
///
/// ```toml
/// [config]
/// strategy = "sleeping"
/// threads = 4
///
/// [launch.A]
/// tasks = 8
/// work = 1000
///
/// [launch.B]
/// tasks = 16
/// after = ["A"]
/// ```
///
/// All sections except the launches are optional and have defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlanFile {
    /// Global settings from `[config]`.
    #[serde(default)]
    pub config: PlanSection,

    /// All launches from `[launch.<name>]`, keyed by launch name.
    #[serde(default)]
    pub launch: BTreeMap<String, LaunchConfig>,
}

/// A validated plan: every `after` reference resolves, no cycles, at least
/// one launch, at least one worker thread.
///
/// Obtain one through `PlanFile::try_from(raw)` or
/// [`load_and_validate`](crate::config::load_and_validate).
#[derive(Debug, Clone)]
pub struct PlanFile {
    pub config: PlanSection,
    pub launch: BTreeMap<String, LaunchConfig>,
}

impl PlanFile {
    pub(crate) fn new_unchecked(
        config: PlanSection,
        launch: BTreeMap<String, LaunchConfig>,
    ) -> Self {
        Self { config, launch }
    }

    /// Total number of invocations across all launches.
    pub fn total_invocations(&self) -> usize {
        self.launch.values().map(|l| l.tasks).sum()
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanSection {
    /// `"serial"`, `"spawn"`, `"spinning"` or `"sleeping"` (default).
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Worker count for the pooled strategies.
    #[serde(default = "default_threads")]
    pub threads: usize,
}

fn default_threads() -> usize {
    4
}

impl Default for PlanSection {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            threads: default_threads(),
        }
    }
}

/// `[launch.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchConfig {
    /// Number of invocations in this launch.
    pub tasks: usize,

    /// Synthetic busy-work iterations performed by each invocation.
    #[serde(default)]
    pub work: u64,

    /// Names of launches that must fully finish before this one starts.
    #[serde(default)]
    pub after: Vec<String>,
}
