//! Repository layout for the manifest tools
//!
//! Both binaries run from the registry repository root; integrations live
//! in one subdirectory per domain under `integrations/`.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::manifest::MANIFEST_FILE;

/// Paths into the registry repository
#[derive(Debug, Clone)]
pub struct RepoPaths {
    pub root: PathBuf,
    pub integrations: PathBuf,
}

impl RepoPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            integrations: root.join("integrations"),
            root,
        }
    }

    /// Build paths rooted at the current working directory
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().context("Could not determine current directory")?;
        Ok(Self::new(cwd))
    }

    /// Path to the manifest file for a given integration domain
    pub fn manifest_for(&self, domain: &str) -> PathBuf {
        self.integrations.join(domain).join(MANIFEST_FILE)
    }

    /// All existing `integrations/*/manifest.json` files, sorted by path.
    ///
    /// A missing integrations directory yields an empty list; callers that
    /// want to report it check `integrations.exists()` themselves.
    pub fn manifest_files(&self) -> Vec<PathBuf> {
        let mut manifests = Vec::new();

        let entries = match fs::read_dir(&self.integrations) {
            Ok(entries) => entries,
            Err(_) => return manifests,
        };

        for entry in entries.flatten() {
            let manifest_path = entry.path().join(MANIFEST_FILE);
            if manifest_path.is_file() {
                manifests.push(manifest_path);
            }
        }

        manifests.sort();
        manifests
    }
}

/// Integration domain slug for a manifest path (its directory name)
pub fn integration_name(manifest_path: &Path) -> String {
    manifest_path
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| manifest_path.display().to_string())
}
