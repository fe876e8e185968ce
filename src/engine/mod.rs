// src/engine/mod.rs

//! Plan execution on top of a task system.
//!
//! - [`runner`] submits a validated plan's launches in dependency order and
//!   waits for them.
//! - [`workload`] is the synthetic per-launch callback that also checks
//!   exactly-once execution and prerequisite ordering.
//! - [`report`] summarises one pass over a plan.

pub mod report;
pub mod runner;
pub mod workload;

pub use report::{LaunchReport, RunReport};
pub use runner::PlanRunner;
pub use workload::LaunchProbe;
