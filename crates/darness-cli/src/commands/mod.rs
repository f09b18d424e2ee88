//! CLI command implementations.
//!
//! - `run`: execute scenarios against the Docker daemon
//! - `validate`: check a scenario file against the schema
//! - `list`: show the scenarios a file declares

use clap::{Parser, Subcommand};

pub mod list;
pub mod run;
pub mod validate;

/// darness - scenario-driven container integration-test harness
#[derive(Parser)]
#[command(name = "darness")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run scenarios from a scenario file
    Run(run::RunArgs),

    /// Validate a scenario file without running anything
    Validate(validate::ValidateArgs),

    /// List the scenarios a file declares
    List(list::ListArgs),
}
