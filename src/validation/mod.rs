//! Schema checks shared by the interactive manager and the batch validator
//!
//! Checks run in a fixed order and report the first violation: required
//! fields, then integration_type validity, then the config_flow rule,
//! then key ordering. The interactive manager deliberately stops before
//! the key-order check; only the batch validator enforces it. That
//! asymmetry is inherited from the original tool and kept as-is.

use serde_json::{Map, Value};

use crate::manifest::{IntegrationType, PINNED_KEYS};

/// Fields every manifest must carry (presence-only check)
pub const REQUIRED_FIELDS: [&str; 4] = ["domain", "name", "documentation", "requirements"];

/// A single schema violation, message-bearing and comparable in tests
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("Error reading file: {0}")]
    Unreadable(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid integration_type: {found}. Must be one of device, service, hub")]
    InvalidIntegrationType { found: String },

    #[error("Manifest with config_flow: true must have integration_type")]
    IntegrationTypeRequired,

    #[error("Keys must be in alphabetical order (except domain and name). Expected: {expected}")]
    KeysOutOfOrder { expected: String },
}

/// Checks applied by the interactive manager after a rewrite: required
/// fields, enum validity, and the config_flow rule. No key-order check.
pub fn validate_data(data: &Map<String, Value>) -> Result<(), ValidationIssue> {
    for field in REQUIRED_FIELDS {
        if !data.contains_key(field) {
            return Err(ValidationIssue::MissingField(field));
        }
    }

    if let Some(value) = data.get("integration_type") {
        let valid = value
            .as_str()
            .is_some_and(|s| s.parse::<IntegrationType>().is_ok());
        if !valid {
            return Err(ValidationIssue::InvalidIntegrationType {
                found: render_value(value),
            });
        }
    }

    if data.get("config_flow").and_then(Value::as_bool) == Some(true)
        && !data.contains_key("integration_type")
    {
        return Err(ValidationIssue::IntegrationTypeRequired);
    }

    Ok(())
}

/// Full batch-validator rule set: everything above plus key ordering
pub fn validate_data_strict(data: &Map<String, Value>) -> Result<(), ValidationIssue> {
    validate_data(data)?;
    check_key_order(data)
}

/// Keys other than `domain`/`name` must be in strict ascending order
pub fn check_key_order(data: &Map<String, Value>) -> Result<(), ValidationIssue> {
    let mut pinned = Vec::new();
    let mut others = Vec::new();
    for key in data.keys() {
        if PINNED_KEYS.contains(&key.as_str()) {
            pinned.push(key.as_str());
        } else {
            others.push(key.as_str());
        }
    }

    let mut sorted = others.clone();
    sorted.sort_unstable();

    if others != sorted {
        let expected = pinned
            .into_iter()
            .chain(sorted)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ValidationIssue::KeysOutOfOrder { expected });
    }

    Ok(())
}

fn render_value(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}
