//! validate-manifests - batch schema check over all manifests
//!
//! Run from the registry repository root with no arguments. Exits 0 iff
//! every manifest passes.

use clap::Parser;

use manifest_tools::batch::BatchValidator;
use manifest_tools::config::RepoPaths;

#[derive(Parser)]
#[command(
    name = "validate-manifests",
    version,
    about = "Validate every integration manifest against the registry schema"
)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();

    let paths = RepoPaths::from_current_dir()?;
    let validator = BatchValidator::new(paths);
    std::process::exit(validator.run());
}
