//! Non-interactive validation across all manifests
//!
//! The batch validator applies the full rule set, including the
//! key-order check the interactive manager leaves out.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{integration_name, RepoPaths};
use crate::validation::{self, ValidationIssue};

pub struct BatchValidator {
    paths: RepoPaths,
}

impl BatchValidator {
    pub fn new(paths: RepoPaths) -> Self {
        Self { paths }
    }

    /// Every manifest under the integrations root, unfiltered
    pub fn discover_all(&self) -> Vec<PathBuf> {
        self.paths.manifest_files()
    }

    /// Validate everything, one report line per manifest plus a summary.
    /// Returns the process exit code: 0 iff no manifest failed. An empty
    /// registry is trivially valid.
    pub fn run(&self) -> i32 {
        let manifests = self.discover_all();

        if manifests.is_empty() {
            println!("No manifest files found");
            return 0;
        }

        println!("Validating {} manifest files...", manifests.len());

        let mut errors = 0usize;
        for manifest_path in &manifests {
            let name = integration_name(manifest_path);
            match validate_one(manifest_path) {
                Ok(()) => println!("✓ {name}: Validation successful"),
                Err(issue) => {
                    errors += 1;
                    println!("❌ {name}: {issue}");
                }
            }
        }

        println!();
        if errors > 0 {
            println!("{errors} validation error(s) found");
            1
        } else {
            println!("✓ All {} manifests are valid", manifests.len());
            0
        }
    }
}

/// Full check of a single manifest file: parse, required fields, enum
/// validity, config_flow rule, key order. First violation wins.
pub fn validate_one(manifest_path: &Path) -> Result<(), ValidationIssue> {
    let raw = fs::read_to_string(manifest_path)
        .map_err(|err| ValidationIssue::Unreadable(err.to_string()))?;
    let data: Map<String, Value> =
        serde_json::from_str(&raw).map_err(|err| ValidationIssue::InvalidJson(err.to_string()))?;
    validation::validate_data_strict(&data)
}
