// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Identifier handed out for each launch.
///
/// Identifiers are allocated monotonically per task system and never reused.
/// Strategies without asynchronous launches always return `0`.
pub type LaunchId = u64;

/// Which scheduling strategy a task system uses.
///
/// - `Serial`: every invocation runs on the caller's thread.
/// - `Spawn`: one fresh thread per invocation, joined before returning.
/// - `Spinning`: persistent workers polling a shared queue (no blocking).
/// - `Sleeping`: persistent workers blocking on a condition variable, with
///   asynchronous launches and dependency edges (default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Serial,
    Spawn,
    Spinning,
    Sleeping,
}

impl StrategyKind {
    /// All strategies, in order of increasing sophistication.
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Serial,
        StrategyKind::Spawn,
        StrategyKind::Spinning,
        StrategyKind::Sleeping,
    ];

    /// Short name as accepted by [`FromStr`] and plan files.
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Serial => "serial",
            StrategyKind::Spawn => "spawn",
            StrategyKind::Spinning => "spinning",
            StrategyKind::Sleeping => "sleeping",
        }
    }

    /// Whether `submit_async` actually returns before the work is done and
    /// honours prerequisites.
    pub fn supports_async(self) -> bool {
        matches!(self, StrategyKind::Sleeping)
    }
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::Sleeping
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "serial" => Ok(StrategyKind::Serial),
            "spawn" => Ok(StrategyKind::Spawn),
            "spinning" => Ok(StrategyKind::Spinning),
            "sleeping" => Ok(StrategyKind::Sleeping),
            other => Err(format!(
                "invalid strategy: {other} (expected \"serial\", \"spawn\", \"spinning\" or \"sleeping\")"
            )),
        }
    }
}
