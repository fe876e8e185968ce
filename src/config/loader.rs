// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{PlanFile, RawPlanFile};
use crate::errors::Result;

/// Load a plan file from a given path and return the raw `RawPlanFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (unknown references, cycles, etc.). Use [`load_and_validate`]
/// for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPlanFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_str(&contents)
}

/// Parse plan TOML that is already in memory.
pub fn parse_str(contents: &str) -> Result<RawPlanFile> {
    let plan: RawPlanFile = toml::from_str(contents)?;
    Ok(plan)
}

/// Load a plan file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - at least one launch and at least one thread,
///   - unknown or self-referencing `after` entries,
///   - dependency cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PlanFile> {
    let raw = load_from_path(&path)?;
    let plan = PlanFile::try_from(raw)?;
    Ok(plan)
}
