// src/dag/mod.rs

//! Launch dependency graph and scheduling state.
//!
//! - [`graph`] holds the forward and reverse dependency indices.
//! - [`scheduler`] contains the state machine that decides when a launch is
//!   ready, counts finished invocations, and retires/promotes launches.
//! - [`launch_info`] provides launch metadata and lifecycle states.
//! - [`scheduler_step`] defines the result type for scheduler steps.

pub mod graph;
pub mod launch_info;
pub mod scheduler;
pub mod scheduler_step;

pub use graph::DependencyGraph;
pub use launch_info::{LaunchRunState, ReadyLaunch};
pub use scheduler::LaunchScheduler;
pub use scheduler_step::SchedulerStep;
