// src/dag/graph.rs

use std::collections::{BTreeSet, HashMap};

use crate::types::LaunchId;

/// Live dependency edges between launches.
///
/// - `forward[launch]` holds the prerequisites of `launch` that have not
///   retired yet. A launch without an entry has no unmet prerequisites.
/// - `reverse[launch]` holds the launches waiting on `launch`, so retiring a
///   launch fans out to its dependents without scanning the whole graph.
///
/// Edges only ever disappear: they are added once when a launch is registered
/// and removed as prerequisites retire. Sets are ordered so that dependents
/// unblocked by the same retirement are promoted in submission order.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    forward: HashMap<LaunchId, BTreeSet<LaunchId>>,
    reverse: HashMap<LaunchId, BTreeSet<LaunchId>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `launch` waits on every launch in `prerequisites`.
    ///
    /// The caller passes only prerequisites that are still live.
    pub fn add_launch(&mut self, launch: LaunchId, prerequisites: BTreeSet<LaunchId>) {
        if prerequisites.is_empty() {
            return;
        }

        for &prerequisite in &prerequisites {
            self.reverse.entry(prerequisite).or_default().insert(launch);
        }
        self.forward.insert(launch, prerequisites);
    }

    /// Drop every edge pointing at `retired` and return the dependents whose
    /// last unmet prerequisite it was, in ascending id order.
    pub fn resolve(&mut self, retired: LaunchId) -> Vec<LaunchId> {
        let Some(dependents) = self.reverse.remove(&retired) else {
            return Vec::new();
        };

        let mut unblocked = Vec::new();
        for dependent in dependents {
            let Some(unmet) = self.forward.get_mut(&dependent) else {
                continue;
            };
            unmet.remove(&retired);
            if unmet.is_empty() {
                self.forward.remove(&dependent);
                unblocked.push(dependent);
            }
        }

        unblocked
    }

    /// Prerequisites of `launch` that have not retired yet.
    pub fn unmet_prerequisites_of(&self, launch: LaunchId) -> Vec<LaunchId> {
        self.forward
            .get(&launch)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Launches currently waiting on `launch`.
    pub fn dependents_of(&self, launch: LaunchId) -> Vec<LaunchId> {
        self.reverse
            .get(&launch)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_blocked(&self, launch: LaunchId) -> bool {
        self.forward.contains_key(&launch)
    }

    /// Whether no edge is left at all.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.reverse.is_empty()
    }
}
