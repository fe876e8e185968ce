// src/config/validate.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{LaunchConfig, PlanFile, RawPlanFile};
use crate::errors::{Result, TaskSysError};

impl TryFrom<RawPlanFile> for PlanFile {
    type Error = TaskSysError;

    fn try_from(raw: RawPlanFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_plan(&raw)?;
        Ok(PlanFile::new_unchecked(raw.config, raw.launch))
    }
}

impl PlanFile {
    /// Launch names in an order where every launch comes after all of the
    /// launches in its `after` list.
    pub fn submission_order(&self) -> Vec<&str> {
        // Validation already rejected cycles, so this cannot fail.
        toposort(&build_graph(&self.launch), None).unwrap_or_default()
    }
}

/// Run every plan check, stopping at the first failure.
pub fn validate_plan(plan: &RawPlanFile) -> Result<()> {
    validate_raw_plan(plan)
}

fn validate_raw_plan(plan: &RawPlanFile) -> Result<()> {
    ensure_has_launches(plan)?;
    validate_global_config(plan)?;
    validate_launch_dependencies(plan)?;
    validate_dag(plan)?;
    Ok(())
}

fn ensure_has_launches(plan: &RawPlanFile) -> Result<()> {
    if plan.launch.is_empty() {
        return Err(TaskSysError::ConfigError(
            "plan must contain at least one [launch.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(plan: &RawPlanFile) -> Result<()> {
    // The strategy is strongly typed and validated during deserialization.
    if plan.config.threads == 0 {
        return Err(TaskSysError::ConfigError(
            "[config].threads must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_launch_dependencies(plan: &RawPlanFile) -> Result<()> {
    for (name, launch) in plan.launch.iter() {
        for dep in launch.after.iter() {
            if dep == name {
                return Err(TaskSysError::ConfigError(format!(
                    "launch '{}' cannot depend on itself in `after`",
                    name
                )));
            }
            if !plan.launch.contains_key(dep) {
                return Err(TaskSysError::ConfigError(format!(
                    "launch '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(plan: &RawPlanFile) -> Result<()> {
    match toposort(&build_graph(&plan.launch), None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(TaskSysError::DagCycle(format!(
            "cycle detected in launch graph involving launch '{}'",
            cycle.node_id()
        ))),
    }
}

/// Edge direction: prerequisite -> dependent.
///
/// For `[launch.B] after = ["A"]` we add edge A -> B.
fn build_graph(launches: &BTreeMap<String, LaunchConfig>) -> DiGraphMap<&str, ()> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in launches.keys() {
        graph.add_node(name.as_str());
    }

    for (name, launch) in launches.iter() {
        for dep in launch.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    graph
}
