// src/config/mod.rs

//! Plan file loading and validation for the `tasksys` runner.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a plan file from disk (`loader.rs`).
//! - Validate basic invariants like launch-graph acyclicity (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str};
pub use model::{LaunchConfig, PlanFile, PlanSection, RawPlanFile};
pub use validate::validate_plan;
