//! Interactive manager for adding `integration_type` to manifests
//!
//! Drives the whole workflow: discover manifests that enable config_flow
//! without declaring a type, prompt the operator for each, rewrite the
//! file in canonical order, re-validate it, commit via git, and finish
//! with one aggregate validation pass. Every per-item failure is counted
//! and the loop moves on; nothing aborts the batch.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{integration_name, RepoPaths};
use crate::exec::{CommandExecutor, ExecRequest};
use crate::manifest::{IntegrationType, Manifest};
use crate::prompt::{self, PromptSource};
use crate::validation;

/// Ceiling for the closing aggregate validation pass
pub const FULL_VALIDATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Companion binary invoked for the aggregate pass
pub const FULL_VALIDATOR: &str = "validate-manifests";

const BANNER_WIDTH: usize = 70;

/// Counters accumulated over one interactive run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub full_validation_failed: bool,
}

impl RunSummary {
    /// Process exit status: 0 only when no item failed and the aggregate
    /// validation (when it ran) passed
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 || self.full_validation_failed {
            1
        } else {
            0
        }
    }
}

pub struct ManifestManager<'a> {
    paths: RepoPaths,
    executor: &'a dyn CommandExecutor,
}

impl<'a> ManifestManager<'a> {
    pub fn new(paths: RepoPaths, executor: &'a dyn CommandExecutor) -> Self {
        Self { paths, executor }
    }

    /// Manifests with `config_flow: true` and no `integration_type`.
    ///
    /// Unreadable or unparsable manifests are reported as warnings and
    /// left out; they never abort discovery.
    pub fn find_manifests_needing_update(&self) -> Vec<PathBuf> {
        if !self.paths.integrations.exists() {
            println!(
                "Error: Integrations directory not found at {}",
                self.paths.integrations.display()
            );
            return Vec::new();
        }

        let mut pending = Vec::new();
        for manifest_path in self.paths.manifest_files() {
            match Manifest::load(&manifest_path) {
                Ok(manifest) => {
                    if manifest.needs_integration_type() {
                        pending.push(manifest_path);
                    }
                }
                Err(err) => {
                    println!("Warning: Could not read {}: {:#}", manifest_path.display(), err);
                }
            }
        }
        pending
    }

    /// Insert the chosen type and rewrite the file in canonical order
    pub fn update_manifest(&self, manifest_path: &Path, integration_type: IntegrationType) -> Result<()> {
        let mut manifest = Manifest::load(manifest_path)?;
        manifest.set_integration_type(integration_type)?;
        manifest.write(manifest_path)
    }

    /// Re-read the just-written file and check the schema rules.
    ///
    /// Key ordering is intentionally not checked here; only the batch
    /// validator enforces it (inherited asymmetry, see DESIGN.md).
    pub fn validate_manifest(&self, manifest_path: &Path) -> bool {
        let manifest = match Manifest::load(manifest_path) {
            Ok(manifest) => manifest,
            Err(err) => {
                println!("✗ {err:#}");
                return false;
            }
        };

        match validation::validate_data(manifest.data()) {
            Ok(()) => {
                println!("✓ Validation passed");
                true
            }
            Err(issue) => {
                println!("✗ {issue}");
                false
            }
        }
    }

    /// Stage the one file and commit it
    pub fn commit_changes(&self, manifest_path: &Path, integration_name: &str) -> Result<()> {
        let add = ExecRequest::new(
            "git",
            vec!["add".to_string(), manifest_path.display().to_string()],
            &self.paths.root,
        );
        let output = self.executor.run(&add)?;
        if !output.success() {
            bail!("git add failed: {}", output.stderr.trim());
        }

        let message = format!(
            "Add integration_type to `manifest.json` for {integration_name}"
        );
        let commit = ExecRequest::new(
            "git",
            vec!["commit".to_string(), "-m".to_string(), message],
            &self.paths.root,
        );
        let output = self.executor.run(&commit)?;
        if !output.success() {
            bail!("git commit failed: {}", output.stderr.trim());
        }

        println!("✓ Committed changes for {integration_name}");
        Ok(())
    }

    /// Run the aggregate validator with a bounded wait, forwarding its
    /// output. Returns whether it reported success; launch failures and
    /// timeouts count as failure, not a crash.
    pub fn run_full_validation(&self) -> bool {
        let request = ExecRequest::new(FULL_VALIDATOR, Vec::new(), &self.paths.root)
            .with_timeout(FULL_VALIDATION_TIMEOUT);

        match self.executor.run(&request) {
            Ok(output) => {
                println!("{}", output.stdout);
                if !output.stderr.is_empty() {
                    println!("{}", output.stderr);
                }
                output.success()
            }
            Err(err) => {
                println!("Error running validation: {err}");
                false
            }
        }
    }

    /// The interactive workflow: prompt, update, validate, and commit
    /// each pending manifest, then run the aggregate validation if
    /// anything changed
    pub fn run(&self, prompts: &mut dyn PromptSource) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        println!("{}", "=".repeat(BANNER_WIDTH));
        println!("Manifest Integration Type Management Tool");
        println!("{}", "=".repeat(BANNER_WIDTH));
        println!();

        let manifests = self.find_manifests_needing_update();

        if manifests.is_empty() {
            println!("No manifests found that need updating.");
            println!("All manifests either have integration_type or don't have config_flow enabled.");
            return Ok(summary);
        }

        println!(
            "Found {} manifest(s) that need integration_type added:",
            manifests.len()
        );
        for manifest_path in &manifests {
            println!("  - {}", integration_name(manifest_path));
        }
        println!();

        for manifest_path in &manifests {
            let name = integration_name(manifest_path);
            println!("{}", "-".repeat(BANNER_WIDTH));

            let Some(integration_type) = prompt::select_integration_type(prompts, &name)? else {
                println!("Skipping {name}");
                summary.skipped += 1;
                continue;
            };

            println!("Setting integration_type to '{integration_type}' for {name}");

            if let Err(err) = self.update_manifest(manifest_path, integration_type) {
                println!("Error updating {}: {:#}", manifest_path.display(), err);
                summary.failed += 1;
                continue;
            }
            println!("✓ Updated {}", manifest_path.display());

            if !self.validate_manifest(manifest_path) {
                println!("Warning: Validation failed for {name}");
                println!("The file has been updated but may have issues.");
                summary.failed += 1;
                continue;
            }

            if let Err(err) = self.commit_changes(manifest_path, &name) {
                println!("Error committing changes: {err:#}");
                summary.failed += 1;
                continue;
            }

            summary.updated += 1;
        }

        println!();
        println!("{}", "=".repeat(BANNER_WIDTH));
        println!("Summary:");
        println!("  Updated: {}", summary.updated);
        println!("  Skipped: {}", summary.skipped);
        println!("  Failed:  {}", summary.failed);
        println!("{}", "=".repeat(BANNER_WIDTH));

        if summary.updated > 0 {
            println!();
            println!("Running full validation with {FULL_VALIDATOR}...");
            println!();
            if !self.run_full_validation() {
                println!();
                println!("Warning: Full validation failed. Please review the errors above.");
                summary.full_validation_failed = true;
            }
        }

        Ok(summary)
    }
}
