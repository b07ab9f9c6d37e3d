//! Command-line surface for SoulDeep.

mod classify;
mod compare;
mod intake;
mod show;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::{Config, StoreConfig};
use crate::store::{LibSqlStore, MemoryStore, PersonaStore};

pub use classify::ClassifyArgs;
pub use compare::CompareArgs;
pub use intake::IntakeArgs;
pub use show::ShowArgs;

/// SoulDeep persona synthesis and Cognitive Break conflict mapping.
#[derive(Debug, Parser)]
#[command(name = "souldeep", version, about)]
pub struct Cli {
    /// Use an in-memory store instead of the database file.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Override the database file path.
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit questionnaire answers: synthesize a persona and store it.
    Intake(IntakeArgs),
    /// Classify the Cognitive Break between two stored personas.
    Compare(CompareArgs),
    /// Classify two persona record files without touching the store.
    Classify(ClassifyArgs),
    /// Print a stored persona.
    Show(ShowArgs),
}

/// Dispatch a parsed invocation.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        ephemeral,
        db,
        command,
    } = cli;

    // The pure path needs no configuration at all.
    if let Command::Classify(args) = &command {
        return classify::run_classify_command(args);
    }

    let config = Config::from_env()?;
    let store = open_store(ephemeral, db, &config.store).await?;

    match command {
        Command::Intake(args) => intake::run_intake_command(&args, &config.llm, store).await,
        Command::Compare(args) => compare::run_compare_command(&args, store).await,
        Command::Show(args) => show::run_show_command(&args, store).await,
        Command::Classify(_) => unreachable!("handled above"),
    }
}

async fn open_store(
    ephemeral: bool,
    db_override: Option<PathBuf>,
    config: &StoreConfig,
) -> anyhow::Result<Arc<dyn PersonaStore>> {
    if ephemeral {
        tracing::info!("Using ephemeral in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let path = db_override.unwrap_or_else(|| config.path.clone());
    Ok(Arc::new(LibSqlStore::open(&path).await?))
}
