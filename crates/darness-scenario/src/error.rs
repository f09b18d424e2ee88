//! Error types for scenario loading and validation.

use thiserror::Error;

/// Result type alias for scenario operations.
pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Errors that can occur while loading or validating scenarios.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Scenario file could not be read.
    #[error("failed to read scenario file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Scenario file is not valid JSON.
    #[error("failed to parse scenario file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Scenario document does not conform to the schema.
    ///
    /// Carries every violation found, not just the first.
    #[error("invalid scenario document: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
