//! Compare CLI command: classify two stored personas.

use std::sync::Arc;

use clap::Args;

use crate::store::PersonaStore;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// First user id.
    pub user_a: String,

    /// Second user id.
    pub user_b: String,
}

/// Run the compare command against the persona store.
pub async fn run_compare_command(
    args: &CompareArgs,
    store: Arc<dyn PersonaStore>,
) -> anyhow::Result<()> {
    let a = store.get(&args.user_a).await?;
    let b = store.get(&args.user_b).await?;

    let result = crate::classifier::classify(&a.inputs, &b.inputs);

    println!("Cognitive Break: {}", result.archetype.name());
    println!("  Cause:  {}", result.archetype.cause());
    println!("  Remedy: {}", result.archetype.remedy());
    Ok(())
}
