//! manage-manifests - interactive integration_type updater
//!
//! Run from the registry repository root with no arguments.

use clap::Parser;

use manifest_tools::config::RepoPaths;
use manifest_tools::exec::SystemExecutor;
use manifest_tools::manager::ManifestManager;
use manifest_tools::prompt::InteractivePrompt;

#[derive(Parser)]
#[command(
    name = "manage-manifests",
    version,
    about = "Add integration_type to manifests that enable config_flow"
)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();

    let paths = RepoPaths::from_current_dir()?;
    let executor = SystemExecutor;
    let manager = ManifestManager::new(paths, &executor);
    let mut prompts = InteractivePrompt::new()?;

    let summary = manager.run(&mut prompts)?;
    std::process::exit(summary.exit_code());
}
