//! Run command implementation.

use anyhow::Result;
use clap::Args;
use darness_docker::DockerClient;
use darness_harness::{ArtifactOutcome, Harness};
use darness_scenario::{ScenarioCollection, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Path to the scenario definition file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Unix socket path of the Docker daemon
    ///
    /// Can also be set via the DOCKER_HOST environment variable.
    #[arg(long)]
    pub daemon_socket: Option<PathBuf>,

    /// Run only the named scenarios, in scenario-file order
    #[arg(long, num_args = 1..)]
    pub scenarios: Vec<String>,
}

/// Executes the run command.
///
/// Scenario failures and artifact mismatches are reported in the summary
/// but do not change the exit code; only configuration and daemon errors
/// do.
pub async fn execute(args: RunArgs) -> Result<()> {
    let collection = ScenarioCollection::load(&args.config)?;

    let client = DockerClient::resolve(args.daemon_socket);
    if !client.is_running().await {
        anyhow::bail!(
            "cannot connect to docker daemon at {}\nIs the daemon running?",
            client.socket_path().display()
        );
    }
    tracing::debug!(socket = %client.socket_path().display(), "connected to docker daemon");

    let harness = Harness::new(Arc::new(client));
    let reports = if args.scenarios.is_empty() {
        harness.run_collection(&collection).await
    } else {
        harness.run_filtered(&collection, &args.scenarios).await
    };

    let succeeded = reports.iter().filter(|r| r.is_success()).count();
    println!();
    println!("ran {} scenarios, {} succeeded", reports.len(), succeeded);
    for report in &reports {
        println!("  {}: {}", report.name, report.outcome);
        for artifact in &report.artifacts {
            match &artifact.outcome {
                ArtifactOutcome::Match => {}
                ArtifactOutcome::Mismatch => {
                    println!("    artifact {}: content mismatch", artifact.name);
                }
                ArtifactOutcome::Error(cause) => {
                    println!("    artifact {}: {cause}", artifact.name);
                }
            }
        }
    }

    Ok(())
}
