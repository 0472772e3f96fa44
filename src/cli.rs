// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `depwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "depwatch",
    version,
    about = "Watch a file's transitive imports and rebuild on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Depwatch.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Depwatch.toml")]
    pub config: String,

    /// Scan and build once based on current state, no watching.
    #[arg(long)]
    pub once: bool,

    /// Scan and print the discovered watch set, but don't build or watch.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEPWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
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
