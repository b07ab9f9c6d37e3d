//! Classify CLI command: the pure path, two persona record files in,
//! archetype out. Touches neither the store nor the synthesizer.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::classifier::classify;
use crate::persona::PersonaRecord;

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Path to the first persona record JSON file.
    #[arg(long, value_name = "FILE")]
    pub a: PathBuf,

    /// Path to the second persona record JSON file.
    #[arg(long, value_name = "FILE")]
    pub b: PathBuf,

    /// Emit the result as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Run the classify command.
pub fn run_classify_command(args: &ClassifyArgs) -> anyhow::Result<()> {
    let a = read_record(&args.a)?;
    let b = read_record(&args.b)?;

    let result = classify(&a, &b);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Cognitive Break: {}", result.archetype.name());
        println!("  Cause:  {}", result.archetype.cause());
        println!("  Remedy: {}", result.archetype.remedy());
    }
    Ok(())
}

fn read_record(path: &Path) -> anyhow::Result<PersonaRecord> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid persona record {}: {e}", path.display()))
}
