//! Scenario execution orchestrator.
//!
//! Drives one container per scenario through create → start → exec →
//! collect → stop → remove, strictly in sequence. The batch loop isolates
//! scenarios from each other: whatever happens inside one scenario, the
//! next one still runs.

use crate::artifact;
use crate::error::HarnessError;
use crate::report::{ArtifactOutcome, ArtifactReport, ScenarioOutcome, ScenarioReport};
use crate::runtime::ContainerRuntime;
use darness_scenario::{Scenario, ScenarioCollection};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Entrypoint used for scenario containers.
///
/// With a TTY attached, an idle shell keeps the container alive so each
/// command runs through exec instead of replacing the image's default
/// process.
const SCENARIO_ENTRYPOINT: &[&str] = &["/bin/sh"];

/// The scenario execution engine.
///
/// Holds the process-wide container runtime, constructed once and shared
/// by reference; each scenario's container handle is owned exclusively by
/// that scenario's execution and released before it is discarded.
pub struct Harness {
    runtime: Arc<dyn ContainerRuntime>,
}

impl Harness {
    /// Creates a harness driving the given container runtime.
    #[must_use]
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }

    /// Runs every scenario in the collection, in collection order.
    ///
    /// A failure inside one scenario is caught, logged, and never stops
    /// the loop from proceeding to the next.
    pub async fn run_collection(&self, collection: &ScenarioCollection) -> Vec<ScenarioReport> {
        let mut reports = Vec::with_capacity(collection.len());
        for (name, scenario) in collection.iter() {
            info!(scenario = %name, "running scenario");
            let report = self.run_scenario(name, scenario).await;
            match &report.outcome {
                ScenarioOutcome::Failed(reason) => {
                    error!(scenario = %name, reason = %reason, "scenario failed");
                }
                outcome => info!(scenario = %name, outcome = %outcome, "scenario completed"),
            }
            reports.push(report);
        }
        reports
    }

    /// Runs the subset of scenarios named in `names`, preserving the
    /// collection's original order. Unknown names are a no-op.
    pub async fn run_filtered(
        &self,
        collection: &ScenarioCollection,
        names: &[String],
    ) -> Vec<ScenarioReport> {
        self.run_collection(&collection.filtered(names)).await
    }

    /// Executes a single scenario through its full container lifecycle.
    ///
    /// Teardown is attempted on every exit path once a container handle
    /// exists, including setup failures.
    pub async fn run_scenario(&self, name: &str, scenario: &Scenario) -> ScenarioReport {
        debug!(scenario = %name, description = %scenario.description, image = %scenario.image, "setting up");

        let entrypoint: Vec<String> = SCENARIO_ENTRYPOINT.iter().map(ToString::to_string).collect();
        let container_id = match self
            .runtime
            .create_container(&scenario.image, &entrypoint)
            .await
        {
            Ok(id) => id,
            Err(cause) => {
                // No handle exists yet, so there is nothing to clean up.
                let err = HarnessError::Setup(format!("create failed: {cause}"));
                return ScenarioReport {
                    name: name.to_string(),
                    outcome: ScenarioOutcome::Failed(err.to_string()),
                    artifacts: Vec::new(),
                };
            }
        };
        info!(scenario = %name, container_id = %container_id, "created container");

        if let Err(cause) = self.runtime.start_container(&container_id).await {
            let err = HarnessError::Setup(format!("start failed: {cause}"));
            self.remove_best_effort(&container_id).await;
            return ScenarioReport {
                name: name.to_string(),
                outcome: ScenarioOutcome::Failed(err.to_string()),
                artifacts: Vec::new(),
            };
        }
        info!(scenario = %name, container_id = %container_id, "started container");

        let mut artifacts = Vec::new();
        let drive_result = self.drive(name, &container_id, scenario, &mut artifacts).await;
        let teardown_result = self.teardown(&container_id).await;

        let outcome = match (drive_result, teardown_result) {
            (Err(err), _) => ScenarioOutcome::Failed(err.to_string()),
            (Ok(()), Err(err)) => ScenarioOutcome::Failed(err.to_string()),
            (Ok(()), Ok(())) => {
                let unverified: Vec<String> = artifacts
                    .iter()
                    .filter(|a| !a.outcome.is_match())
                    .map(|a| a.name.clone())
                    .collect();
                if unverified.is_empty() {
                    ScenarioOutcome::Succeeded
                } else {
                    ScenarioOutcome::CompletedWithMismatches(unverified)
                }
            }
        };

        ScenarioReport {
            name: name.to_string(),
            outcome,
            artifacts,
        }
    }

    /// Runs the scenario's commands and collects its artifacts inside a
    /// live container. Split out so the caller can sequence teardown after
    /// it on every path.
    async fn drive(
        &self,
        name: &str,
        container_id: &str,
        scenario: &Scenario,
        artifacts: &mut Vec<ArtifactReport>,
    ) -> Result<(), HarnessError> {
        for argv in &scenario.commands {
            // A non-zero exit status inside the container is not an
            // error; only the exec call itself failing is fatal.
            let output = self
                .runtime
                .exec(container_id, argv)
                .await
                .map_err(HarnessError::Exec)?;
            info!(
                scenario = %name,
                command = %argv.join(" "),
                output = %output.trim_end(),
                "command executed"
            );
        }

        for spec in &scenario.artifacts {
            let outcome = artifact::collect(self.runtime.as_ref(), container_id, spec).await;
            if let ArtifactOutcome::Mismatch = outcome {
                warn!(scenario = %name, artifact = %spec.name, "artifact mismatch");
            }
            artifacts.push(ArtifactReport {
                name: spec.name.clone(),
                outcome,
            });
        }

        Ok(())
    }

    /// Stops and force-removes a container. Failures are logged and
    /// returned for the outcome rollup, never propagated to the batch.
    async fn teardown(&self, container_id: &str) -> Result<(), HarnessError> {
        debug!(container_id = %container_id, "stopping container");
        let stop_result = self.runtime.stop_container(container_id).await;
        if let Err(ref cause) = stop_result {
            warn!(container_id = %container_id, error = %cause, "failed to stop container");
        }

        debug!(container_id = %container_id, "removing container");
        // Forced removal does not require a clean stop.
        let remove_result = self.runtime.remove_container(container_id, true).await;
        if let Err(ref cause) = remove_result {
            warn!(container_id = %container_id, error = %cause, "failed to remove container");
        }

        match (stop_result, remove_result) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(cause), _) | (_, Err(cause)) => Err(HarnessError::Teardown(cause)),
        }
    }

    /// Best-effort removal for a container that never started.
    async fn remove_best_effort(&self, container_id: &str) {
        if let Err(cause) = self.runtime.remove_container(container_id, true).await {
            warn!(
                container_id = %container_id,
                error = %cause,
                "failed to remove container after setup failure"
            );
        }
    }
}
