// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::StrategyKind;

/// Command-line arguments for `tasksys`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tasksys",
    version,
    about = "Run bulk task launches with dependency edges on a choice of scheduling strategies.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the plan file (TOML).
    ///
    /// Default: `Tasksys.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Tasksys.toml")]
    pub plan: String,

    /// Scheduling strategy (serial, spawn, spinning, sleeping).
    ///
    /// Overrides `[config].strategy` from the plan.
    #[arg(long, value_name = "NAME")]
    pub strategy: Option<StrategyKind>,

    /// Worker thread count for the pooled strategies.
    ///
    /// Overrides `[config].threads` from the plan.
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Run the plan this many times on the same task system.
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub repeat: usize,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKSYS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the submission order, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
