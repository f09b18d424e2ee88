//! Scenario data model.

use crate::error::{Result, ScenarioError};
use crate::validate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// An artifact expected to exist inside the container after the scenario's
/// commands have run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioArtifact {
    /// Identifier used for temp-file naming and reporting.
    pub name: String,
    /// Absolute path inside the container filesystem.
    pub location: String,
    /// Path on the host holding the expected contents.
    #[serde(rename = "comparisonLocation")]
    pub comparison_location: String,
}

/// A single named test case: an image, an ordered command list, and the
/// artifacts to collect and compare afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Container image reference, e.g. `alpine:latest`.
    pub image: String,
    /// Commands to execute in order, each an argv vector.
    pub commands: Vec<Vec<String>>,
    /// Artifacts to collect in order after all commands complete.
    pub artifacts: Vec<ScenarioArtifact>,
    /// Human-readable description. May be empty.
    pub description: String,
}

/// An ordered collection of named scenarios.
///
/// Iteration order is the document insertion order; a filtered view keeps
/// that order and silently drops names the collection does not contain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioCollection {
    entries: Vec<(String, Scenario)>,
}

impl ScenarioCollection {
    /// Loads and validates a scenario collection from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// does not conform to the scenario schema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let collection = Self::from_slice(&contents)?;
        debug!(
            path = %path.display(),
            scenarios = collection.len(),
            "loaded scenario collection"
        );
        Ok(collection)
    }

    /// Parses and validates a scenario collection from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not valid JSON or the document
    /// does not conform to the scenario schema.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let document: Value = serde_json::from_slice(bytes)?;
        Self::from_value(&document)
    }

    /// Validates a parsed JSON document and converts it into a collection.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::Invalid` carrying every schema violation
    /// found in the document.
    pub fn from_value(document: &Value) -> Result<Self> {
        validate::validate(document)?;

        // serde_json's preserve_order feature keeps the map in document
        // order; validate has already rejected non-object documents.
        let Some(object) = document.as_object() else {
            return Err(ScenarioError::Invalid(vec![
                "top-level value must be an object".to_string(),
            ]));
        };
        let mut entries = Vec::with_capacity(object.len());
        for (name, value) in object {
            let scenario: Scenario = serde_json::from_value(value.clone())?;
            entries.push((name.clone(), scenario));
        }

        Ok(Self { entries })
    }

    /// Serializes the collection back into a JSON document, preserving
    /// scenario order.
    ///
    /// # Errors
    ///
    /// Returns an error if a scenario cannot be serialized.
    pub fn to_value(&self) -> Result<Value> {
        let mut object = serde_json::Map::with_capacity(self.entries.len());
        for (name, scenario) in &self.entries {
            object.insert(name.clone(), serde_json::to_value(scenario)?);
        }
        Ok(Value::Object(object))
    }

    /// Looks up a scenario by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    /// Returns a view restricted to the requested names, preserving the
    /// collection's original order. Names the collection does not contain
    /// are ignored.
    #[must_use]
    pub fn filtered(&self, names: &[String]) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(name, _)| names.iter().any(|n| n == name))
            .cloned()
            .collect();
        Self { entries }
    }

    /// Iterates scenarios in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scenario)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Number of scenarios in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
