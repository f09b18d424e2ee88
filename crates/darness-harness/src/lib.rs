//! # darness-harness
//!
//! The scenario execution engine.
//!
//! For each scenario the harness drives one container through its full
//! lifecycle, strictly in sequence:
//!
//! ```text
//! create → start → exec (per command) → collect (per artifact) → stop → remove
//! ```
//!
//! Failures are contained at the smallest scope that preserves forward
//! progress: a broken artifact never stops the remaining artifacts or the
//! teardown, and a broken scenario never stops the rest of the batch.
//! Teardown is attempted on every exit path once a container handle
//! exists.
//!
//! The engine talks to the container runtime only through the
//! [`ContainerRuntime`] trait, so it runs unchanged against the real
//! Docker client or a mock in tests.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod artifact;
pub mod error;
pub mod report;
pub mod runner;
pub mod runtime;

pub use error::{HarnessError, Result};
pub use report::{ArtifactOutcome, ArtifactReport, ScenarioOutcome, ScenarioReport};
pub use runner::Harness;
pub use runtime::ContainerRuntime;
