// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! The scheduling core never fails at runtime; these errors come from the
//! plan runner (config loading and validation).

use thiserror::Error;

use crate::types::LaunchId;

#[derive(Error, Debug)]
pub enum TaskSysError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Launch not found: {0}")]
    UnknownLaunch(String),

    #[error("Cycle detected in launch graph: {0}")]
    DagCycle(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskSysError {
    /// Error for a launch identifier that the task system never handed out.
    pub fn unknown_launch_id(id: LaunchId) -> Self {
        TaskSysError::UnknownLaunch(format!("launch id {id} was never issued"))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskSysError>;
