//! Manifest records for integrations
//!
//! A manifest is the per-integration `manifest.json` file. Records are
//! kept as raw JSON maps so unknown keys pass through untouched; the
//! `preserve_order` feature of serde_json keeps file order, which the
//! canonical rewrite and the key-order check both rely on.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Keys pinned to the top of every serialized manifest, in this order
pub const PINNED_KEYS: [&str; 2] = ["domain", "name"];

/// Closed classification of an integration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationType {
    Device,
    Service,
    Hub,
}

impl IntegrationType {
    pub const ALL: [IntegrationType; 3] = [
        IntegrationType::Device,
        IntegrationType::Service,
        IntegrationType::Hub,
    ];

    /// Comma-separated option list for prompts and error messages
    pub fn options() -> String {
        Self::ALL
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for IntegrationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationType::Device => write!(f, "device"),
            IntegrationType::Service => write!(f, "service"),
            IntegrationType::Hub => write!(f, "hub"),
        }
    }
}

impl std::str::FromStr for IntegrationType {
    type Err = String;

    // Exact match only: the schema's closed set is lowercase, and the
    // prompt loop normalizes operator input before parsing
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "device" => Ok(IntegrationType::Device),
            "service" => Ok(IntegrationType::Service),
            "hub" => Ok(IntegrationType::Hub),
            _ => Err(format!(
                "Invalid integration_type: {}. Use: {}",
                s,
                IntegrationType::options()
            )),
        }
    }
}

/// An in-memory manifest record
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    data: Map<String, Value>,
}

impl Manifest {
    pub fn from_data(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let data: Map<String, Value> = serde_json::from_str(&raw)
            .with_context(|| format!("Could not parse {}", path.display()))?;
        Ok(Self { data })
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// True only for a boolean `true` value, mirroring the schema rule
    pub fn has_config_flow(&self) -> bool {
        self.data.get("config_flow").and_then(Value::as_bool) == Some(true)
    }

    pub fn has_integration_type(&self) -> bool {
        self.data.contains_key("integration_type")
    }

    /// Whether this manifest is missing a required `integration_type`
    pub fn needs_integration_type(&self) -> bool {
        self.has_config_flow() && !self.has_integration_type()
    }

    pub fn set_integration_type(&mut self, integration_type: IntegrationType) -> Result<()> {
        let value = serde_json::to_value(integration_type)
            .context("Could not serialize integration_type")?;
        self.data.insert("integration_type".to_string(), value);
        Ok(())
    }

    /// Reorder keys in place: `domain` and `name` first, the rest sorted
    pub fn canonicalize(&mut self) {
        let mut ordered = Map::new();

        for key in PINNED_KEYS {
            if let Some(value) = self.data.remove(key) {
                ordered.insert(key.to_string(), value);
            }
        }

        let mut rest: Vec<String> = self.data.keys().cloned().collect();
        rest.sort();
        for key in rest {
            if let Some(value) = self.data.remove(&key) {
                ordered.insert(key, value);
            }
        }

        self.data = ordered;
    }

    /// Canonical file form: 2-space indent, non-ASCII unescaped, one
    /// trailing newline
    pub fn to_canonical_string(&self) -> Result<String> {
        let mut canonical = self.clone();
        canonical.canonicalize();
        let mut rendered = serde_json::to_string_pretty(&canonical.data)
            .context("Could not serialize manifest")?;
        rendered.push('\n');
        Ok(rendered)
    }

    /// Rewrite the whole file at `path` in canonical form
    pub fn write(&self, path: &Path) -> Result<()> {
        let rendered = self.to_canonical_string()?;
        fs::write(path, rendered)
            .with_context(|| format!("Could not write {}", path.display()))?;
        Ok(())
    }
}
