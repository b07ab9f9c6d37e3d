//! Show CLI command: print a stored persona.

use std::sync::Arc;

use clap::Args;

use crate::store::PersonaStore;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// User id to look up.
    pub user: String,
}

/// Run the show command.
pub async fn run_show_command(args: &ShowArgs, store: Arc<dyn PersonaStore>) -> anyhow::Result<()> {
    let persona = store.get(&args.user).await?;
    println!("{}", serde_json::to_string_pretty(&persona)?);
    Ok(())
}
