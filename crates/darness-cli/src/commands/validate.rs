//! Validate command implementation.

use anyhow::Result;
use clap::Args;
use darness_scenario::{ScenarioCollection, ScenarioError, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the scenario definition file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

/// Executes the validate command.
pub async fn execute(args: ValidateArgs) -> Result<()> {
    match ScenarioCollection::load(&args.config) {
        Ok(collection) => {
            println!(
                "{}: {} scenarios, all valid",
                args.config.display(),
                collection.len()
            );
            Ok(())
        }
        Err(ScenarioError::Invalid(violations)) => {
            eprintln!("{}: invalid scenario document", args.config.display());
            for violation in &violations {
                eprintln!("  {violation}");
            }
            anyhow::bail!("{} validation errors", violations.len())
        }
        Err(e) => Err(e.into()),
    }
}
