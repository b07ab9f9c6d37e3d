//! Persona synthesis via an LLM provider.
//!
//! Supports two backends:
//! - **Ollama** (default): local model inference via `/api/generate`
//! - **OpenAI-compatible**: any endpoint that speaks the Chat Completions API
//!
//! The synthesizer is an injected dependency: orchestration code receives an
//! `Arc<dyn Synthesizer>` and tests substitute a fake. Providers return the
//! model's raw JSON text; `parse_persona_response` turns it into a validated
//! [`SoulDeepPersona`] or rejects it.

mod ollama;
mod openai_compatible;
mod prompt;

pub use ollama::OllamaSynthesizer;
pub use openai_compatible::OpenAiCompatibleSynthesizer;
pub use prompt::{SYSTEM_PROMPT, user_prompt};

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{LlmBackend, LlmConfig};
use crate::error::SynthesisError;
use crate::persona::{DefenseArchetype, QuestionnaireAnswers, SoulDeepPersona};

/// An upstream collaborator that turns questionnaire answers into a
/// synthesized persona.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Name of the underlying provider, for logs and error messages.
    fn provider_name(&self) -> &str;

    /// Synthesize a persona from validated questionnaire answers.
    async fn synthesize(
        &self,
        answers: &QuestionnaireAnswers,
    ) -> Result<SoulDeepPersona, SynthesisError>;
}

/// Create a synthesizer based on configuration.
pub fn create_synthesizer(config: &LlmConfig) -> Result<Arc<dyn Synthesizer>, SynthesisError> {
    match config.backend {
        LlmBackend::Ollama => {
            let ollama = config
                .ollama
                .as_ref()
                .ok_or_else(|| SynthesisError::RequestFailed {
                    provider: "ollama".to_string(),
                    reason: "ollama backend selected but not configured".to_string(),
                })?;
            tracing::info!(
                base_url = %ollama.base_url,
                model = %ollama.model,
                "Using Ollama for persona synthesis"
            );
            Ok(Arc::new(OllamaSynthesizer::new(ollama.clone())?))
        }
        LlmBackend::OpenAiCompatible => {
            let compat =
                config
                    .openai_compatible
                    .as_ref()
                    .ok_or_else(|| SynthesisError::RequestFailed {
                        provider: "openai_compatible".to_string(),
                        reason: "openai_compatible backend selected but not configured".to_string(),
                    })?;
            tracing::info!(
                base_url = %compat.base_url,
                model = %compat.model,
                "Using OpenAI-compatible endpoint for persona synthesis"
            );
            Ok(Arc::new(OpenAiCompatibleSynthesizer::new(compat.clone())?))
        }
    }
}

/// The model's JSON output contract. Aliases accept the field names the
/// conflict-mapping prompt evolved through, so a model echoing an older
/// prompt form still parses.
#[derive(Debug, Deserialize)]
struct RawPersona {
    #[serde(alias = "persona_analysis")]
    analysis: String,
    #[serde(alias = "B15_seams_mechanism", alias = "B15_flaw_mechanism")]
    seams_mechanism: String,
    structural_principle: String,
    #[serde(alias = "scar_demand_requirement")]
    scar_demand: String,
    #[serde(alias = "red_button_requirement")]
    red_button: String,
    #[serde(alias = "blast_radius_archetype")]
    blast_radius: String,
}

/// Parse and validate a provider's raw completion text into a persona.
///
/// Strips markdown code fences if the model wrapped its JSON, requires every
/// contract field, and rejects a defense archetype outside the closed set.
/// The TKI score is computed from the answers, not taken from the model.
pub(crate) fn parse_persona_response(
    provider: &str,
    raw: &str,
    answers: &QuestionnaireAnswers,
) -> Result<SoulDeepPersona, SynthesisError> {
    let json = strip_code_fences(raw);

    let parsed: RawPersona =
        serde_json::from_str(json).map_err(|e| SynthesisError::InvalidResponse {
            provider: provider.to_string(),
            reason: format!(
                "persona JSON parse error: {}. Raw: {}",
                e,
                &json[..json.len().min(200)]
            ),
        })?;

    let blast_radius: DefenseArchetype =
        parsed
            .blast_radius
            .parse()
            .map_err(|e| SynthesisError::InvalidResponse {
                provider: provider.to_string(),
                reason: format!("{e}"),
            })?;

    Ok(SoulDeepPersona {
        analysis: parsed.analysis,
        seams_mechanism: parsed.seams_mechanism,
        tki_score: answers.tki_score(),
        structural_principle: parsed.structural_principle,
        scar_demand: parsed.scar_demand,
        red_button: parsed.red_button,
        blast_radius,
        inputs: answers.to_record(),
    })
}

/// Remove a surrounding markdown code fence (```json ... ```) if present.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line, then the closing fence.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    body.trim().trim_end_matches("```").trim()
}
