//! Per-scenario execution results.

/// Result of comparing one collected artifact against its reference file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// Extracted content is byte-identical to the reference file.
    Match,
    /// Extracted content differs from the reference file.
    Mismatch,
    /// The artifact could not be fetched, extracted, or read.
    Error(String),
}

impl ArtifactOutcome {
    /// Returns whether the artifact content was verified as identical.
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

/// One artifact's result, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReport {
    pub name: String,
    pub outcome: ArtifactOutcome,
}

/// Final outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioOutcome {
    /// All commands ran, every artifact matched, teardown succeeded.
    Succeeded,
    /// Setup, command execution, or teardown failed.
    Failed(String),
    /// The scenario ran to completion but one or more artifacts did not
    /// verify. Carries the names of the unverified artifacts.
    CompletedWithMismatches(Vec<String>),
}

impl std::fmt::Display for ScenarioOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            Self::CompletedWithMismatches(names) => {
                write!(f, "completed with mismatches: {}", names.join(", "))
            }
        }
    }
}

/// Report for one executed scenario, finalized when teardown completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub name: String,
    pub outcome: ScenarioOutcome,
    /// Per-artifact results in declared order. Empty if the scenario
    /// failed before artifact collection.
    pub artifacts: Vec<ArtifactReport>,
}

impl ScenarioReport {
    /// Returns whether the scenario succeeded outright.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ScenarioOutcome::Succeeded)
    }
}
