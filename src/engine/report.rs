// src/engine/report.rs

//! Outcome of running a plan once.

use std::fmt;
use std::time::Duration;

use crate::engine::workload::LaunchProbe;
use crate::types::LaunchId;

/// Per-launch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    pub name: String,
    pub launch_id: LaunchId,
    pub tasks: usize,
    pub executed: usize,
    pub duplicated: Vec<usize>,
    pub missing: Vec<usize>,
    pub ordering_violations: usize,
    pub out_of_range: usize,
}

impl LaunchReport {
    pub fn from_probe(launch_id: LaunchId, probe: &LaunchProbe) -> Self {
        Self {
            name: probe.name().to_string(),
            launch_id,
            tasks: probe.total(),
            executed: probe.executed(),
            duplicated: probe.duplicated_indices(),
            missing: probe.missing_indices(),
            ordering_violations: probe.ordering_violations(),
            out_of_range: probe.out_of_range(),
        }
    }

    /// Every index ran exactly once and never ahead of a prerequisite.
    pub fn is_clean(&self) -> bool {
        self.executed == self.tasks
            && self.duplicated.is_empty()
            && self.missing.is_empty()
            && self.ordering_violations == 0
            && self.out_of_range == 0
    }
}

/// Result of one pass over a plan.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Task system name, as reported by `TaskSystem::name`.
    pub strategy: &'static str,
    pub elapsed: Duration,
    /// In submission order.
    pub launches: Vec<LaunchReport>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.launches.iter().all(LaunchReport::is_clean)
    }

    pub fn total_executed(&self) -> usize {
        self.launches.iter().map(|l| l.executed).sum()
    }

    pub fn launch(&self, name: &str) -> Option<&LaunchReport> {
        self.launches.iter().find(|l| l.name == name)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}] {} launches, {} invocations in {:.3} ms",
            self.strategy,
            self.launches.len(),
            self.total_executed(),
            self.elapsed.as_secs_f64() * 1000.0
        )?;

        for l in &self.launches {
            let status = if l.is_clean() { "ok" } else { "FAILED" };
            write!(
                f,
                "  - {} (id {}): {}/{} executed [{status}]",
                l.name, l.launch_id, l.executed, l.tasks
            )?;
            if !l.duplicated.is_empty() {
                write!(f, " duplicated={:?}", l.duplicated)?;
            }
            if !l.missing.is_empty() {
                write!(f, " missing={:?}", l.missing)?;
            }
            if l.ordering_violations > 0 {
                write!(f, " ordering_violations={}", l.ordering_violations)?;
            }
            if l.out_of_range > 0 {
                write!(f, " out_of_range={}", l.out_of_range)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
