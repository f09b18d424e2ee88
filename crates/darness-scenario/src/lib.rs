//! # darness-scenario
//!
//! Scenario definitions for the darness harness.
//!
//! A scenario names a container image, an ordered list of commands to run
//! inside it, and a set of artifacts to pull back out and compare against
//! reference files on the host. Scenarios are declared in a JSON document
//! mapping scenario names to scenario objects:
//!
//! ```json
//! {
//!   "smoke-test": {
//!     "image": "alpine:latest",
//!     "commands": [["echo", "hello"], ["touch", "/tmp/out.txt"]],
//!     "artifacts": [
//!       {"name": "out", "location": "/tmp/out.txt",
//!        "comparisonLocation": "./fixtures/out.txt"}
//!     ],
//!     "description": "basic smoke test"
//!   }
//! }
//! ```
//!
//! Document order is preserved: scenarios execute in the order they appear
//! in the file, and each scenario's commands and artifacts run in declared
//! order.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod model;
pub mod validate;

pub use error::{Result, ScenarioError};
pub use model::{Scenario, ScenarioArtifact, ScenarioCollection};
pub use validate::validate;

/// Default location of the scenario definition file.
pub const DEFAULT_CONFIG_FILE: &str = "./darness.config.json";
