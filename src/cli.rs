// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `assetpipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "assetpipe",
    version,
    about = "Compose file transforms into parallel/series task graphs with watch + live reload.",
    long_about = None
)]
pub struct CliArgs {
    /// Pipeline or task name to run.
    ///
    /// `default` runs the full asset build and enters watch mode;
    /// `build` cleans and collects the final artifact tree. Any single
    /// task name (e.g. `styles`, `scripts`) is also accepted.
    #[arg(value_name = "PIPELINE", default_value = "default")]
    pub pipeline: String,

    /// Path to an optional TOML config overriding pipeline options.
    ///
    /// Default: `Assetpipe.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Run the selected pipeline a single time; never start watch mode.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ASSETPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved pipelines but don't execute anything.
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
