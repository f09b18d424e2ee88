//! Error types for scenario execution.

use thiserror::Error;

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors that can occur while executing a scenario.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Container create or start failed. Fatal to the scenario.
    #[error("container setup failed: {0}")]
    Setup(String),

    /// The exec call itself failed (not a non-zero command exit status).
    /// Fatal to the scenario.
    #[error("command execution failed: {0}")]
    Exec(String),

    /// Fetching, extracting, or reading one artifact failed. Non-fatal;
    /// remaining artifacts and teardown still proceed.
    #[error("artifact collection failed for {name}: {cause}")]
    Collection { name: String, cause: String },

    /// Container stop or remove failed. Logged, never propagated to the
    /// batch loop.
    #[error("container teardown failed: {0}")]
    Teardown(String),

    /// I/O error on the host side.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
