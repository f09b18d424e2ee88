//! Schema validation for scenario documents.
//!
//! Validation walks the whole document and aggregates every violation into
//! a single error, so an operator sees all problems in one pass instead of
//! fixing them one at a time.

use crate::error::{Result, ScenarioError};
use serde_json::Value;

/// Validates a parsed scenario document against the schema.
///
/// The document must be an object mapping scenario names to objects with:
///
/// - `image`: non-empty string
/// - `commands`: array of arrays of non-empty strings
/// - `artifacts`: array of objects with non-empty string fields `name`,
///   `location`, and `comparisonLocation`
/// - `description`: string (may be empty)
///
/// # Errors
///
/// Returns `ScenarioError::Invalid` carrying one message per violation.
pub fn validate(document: &Value) -> Result<()> {
    let mut violations = Vec::new();

    let Some(object) = document.as_object() else {
        return Err(ScenarioError::Invalid(vec![
            "top-level value must be an object mapping scenario names to scenarios".to_string(),
        ]));
    };

    for (name, scenario) in object {
        validate_scenario(name, scenario, &mut violations);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ScenarioError::Invalid(violations))
    }
}

fn validate_scenario(name: &str, value: &Value, violations: &mut Vec<String>) {
    let Some(scenario) = value.as_object() else {
        violations.push(format!("{name}: scenario must be an object"));
        return;
    };

    match scenario.get("image").and_then(Value::as_str) {
        Some(image) if !image.is_empty() => {}
        Some(_) => violations.push(format!("{name}.image: must not be empty")),
        None => violations.push(format!("{name}.image: missing or not a string")),
    }

    match scenario.get("commands").and_then(Value::as_array) {
        Some(commands) => {
            for (i, command) in commands.iter().enumerate() {
                validate_command(name, i, command, violations);
            }
        }
        None => violations.push(format!("{name}.commands: missing or not an array")),
    }

    match scenario.get("artifacts").and_then(Value::as_array) {
        Some(artifacts) => {
            for (i, artifact) in artifacts.iter().enumerate() {
                validate_artifact(name, i, artifact, violations);
            }
        }
        None => violations.push(format!("{name}.artifacts: missing or not an array")),
    }

    if !scenario.get("description").is_some_and(Value::is_string) {
        violations.push(format!("{name}.description: missing or not a string"));
    }
}

fn validate_command(name: &str, index: usize, value: &Value, violations: &mut Vec<String>) {
    let Some(argv) = value.as_array() else {
        violations.push(format!(
            "{name}.commands[{index}]: expected an array of strings"
        ));
        return;
    };

    for (i, token) in argv.iter().enumerate() {
        match token.as_str() {
            Some(token) if !token.is_empty() => {}
            Some(_) => violations.push(format!(
                "{name}.commands[{index}][{i}]: must not be empty"
            )),
            None => violations.push(format!("{name}.commands[{index}][{i}]: not a string")),
        }
    }
}

fn validate_artifact(name: &str, index: usize, value: &Value, violations: &mut Vec<String>) {
    let Some(artifact) = value.as_object() else {
        violations.push(format!("{name}.artifacts[{index}]: expected an object"));
        return;
    };

    for field in ["name", "location", "comparisonLocation"] {
        match artifact.get(field).and_then(Value::as_str) {
            Some(v) if !v.is_empty() => {}
            Some(_) => violations.push(format!(
                "{name}.artifacts[{index}].{field}: must not be empty"
            )),
            None => violations.push(format!(
                "{name}.artifacts[{index}].{field}: missing or not a string"
            )),
        }
    }
}
