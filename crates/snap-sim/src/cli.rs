//! Command-line interface definitions for snap-sim.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface for the `snap-sim` binary.
#[derive(Parser, Debug)]
#[command(
    name = "snap-sim",
    about = "Replay keyboard snapping and snap assist against a simulated desktop",
    version
)]
pub struct Cli {
    /// Logging controls shared across snap binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level simulator commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a scenario's steps and print what happened.
    Run(RunArgs),
    /// Show which zones an assist would offer after snapping into a zone.
    Preview(PreviewArgs),
    /// Print the directional transition tables.
    Table,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Scenario file (RON).
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Snap configuration (RON); overrides any config embedded in the scenario.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Honour `wait` steps in wall-clock time instead of virtual time.
    #[arg(long)]
    pub real_time: bool,
}

/// Arguments for the `preview` subcommand.
#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    /// Scenario file (RON); only its desktop and windows are used.
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Zone that was just snapped, e.g. `left`, `top-right`.
    #[arg(long, value_name = "ZONE")]
    pub zone: String,

    /// Snap configuration (RON).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
