//! Intake CLI command: questionnaire answers in, stored persona out.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::config::LlmConfig;
use crate::intake::IntakeService;
use crate::persona::QuestionnaireAnswers;
use crate::store::PersonaStore;
use crate::synthesis::create_synthesizer;

#[derive(Debug, Args)]
pub struct IntakeArgs {
    /// User id to store the persona under.
    #[arg(long)]
    pub user: String,

    /// Path to a JSON file with the questionnaire answers. Accepts either
    /// the named fields (scar, foundation, seams, needs_vs_peace,
    /// common_vs_avoid) or the questionnaire codes (B14, B16, B15, B21_A,
    /// B21_B).
    #[arg(long, value_name = "FILE")]
    pub answers: PathBuf,
}

/// Run the intake command: validate, synthesize, store, print.
pub async fn run_intake_command(
    args: &IntakeArgs,
    llm: &LlmConfig,
    store: Arc<dyn PersonaStore>,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.answers)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", args.answers.display()))?;
    let answers: QuestionnaireAnswers = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid answers file {}: {e}", args.answers.display()))?;

    let synthesizer = create_synthesizer(llm)?;
    let service = IntakeService::new(synthesizer, store);

    let outcome = service.submit(&args.user, &answers).await?;
    println!("{}", serde_json::to_string_pretty(&outcome.persona)?);

    if let Some(store_error) = outcome.store_error {
        // Partial success: the persona above is valid, only persistence failed.
        anyhow::bail!(
            "persona synthesized for '{}' but not stored: {store_error}",
            args.user
        );
    }

    eprintln!("Persona stored for '{}'.", args.user);
    Ok(())
}
