//! List command implementation.

use anyhow::Result;
use clap::Args;
use darness_scenario::{ScenarioCollection, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Path to the scenario definition file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

/// Executes the list command.
pub async fn execute(args: ListArgs) -> Result<()> {
    let collection = ScenarioCollection::load(&args.config)?;

    for (name, scenario) in collection.iter() {
        if scenario.description.is_empty() {
            println!("{name}");
        } else {
            println!("{name}\t{}", scenario.description);
        }
    }

    Ok(())
}
