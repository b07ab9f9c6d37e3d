//! Ollama synthesis provider.
//!
//! Talks to a local Ollama instance via the native `/api/generate` endpoint
//! with `format: "json"` so the model is constrained to emit a JSON object.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::OllamaConfig;
use crate::error::SynthesisError;
use crate::persona::{QuestionnaireAnswers, SoulDeepPersona};
use crate::synthesis::prompt::{SYSTEM_PROMPT, user_prompt};
use crate::synthesis::{Synthesizer, parse_persona_response};

/// Provider name constant to avoid magic strings.
const PROVIDER_NAME: &str = "ollama";

/// Persona synthesizer backed by a local Ollama instance.
pub struct OllamaSynthesizer {
    client: Client,
    config: OllamaConfig,
}

impl OllamaSynthesizer {
    /// Create a new Ollama synthesizer.
    pub fn new(config: OllamaConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| SynthesisError::RequestFailed {
                provider: PROVIDER_NAME.to_string(),
                reason: format!("Failed to build reqwest client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// Construct the generate endpoint URL.
    fn api_url(&self) -> String {
        format!(
            "{}/api/generate",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Synthesizer for OllamaSynthesizer {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn synthesize(
        &self,
        answers: &QuestionnaireAnswers,
    ) -> Result<SoulDeepPersona, SynthesisError> {
        let url = self.api_url();
        let request = GenerateRequest {
            model: &self.config.model,
            prompt: user_prompt(answers),
            system: SYSTEM_PROMPT,
            format: "json",
            stream: false,
        };

        tracing::debug!(%url, model = %self.config.model, "Sending synthesis request to Ollama");

        let response = self.client.post(&url).json(&request).send().await.map_err(|e| {
            // An unreachable local daemon is the common transient failure.
            tracing::error!("Ollama request failed: {}", e);
            SynthesisError::Unavailable {
                provider: PROVIDER_NAME.to_string(),
                reason: format!("is `ollama serve` running? {}", e),
            }
        })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| SynthesisError::RequestFailed {
                provider: PROVIDER_NAME.to_string(),
                reason: format!("Failed to read response body: {}", e),
            })?;

        tracing::debug!(%status, "Ollama response received");

        if !status.is_success() {
            if status.is_server_error() {
                return Err(SynthesisError::Unavailable {
                    provider: PROVIDER_NAME.to_string(),
                    reason: format!("HTTP {}", status),
                });
            }
            return Err(SynthesisError::RequestFailed {
                provider: PROVIDER_NAME.to_string(),
                reason: format!(
                    "HTTP {}: {}",
                    status,
                    &response_text[..response_text.len().min(200)]
                ),
            });
        }

        let generate: GenerateResponse =
            serde_json::from_str(&response_text).map_err(|e| SynthesisError::InvalidResponse {
                provider: PROVIDER_NAME.to_string(),
                reason: format!("JSON parse error: {}", e),
            })?;

        parse_persona_response(PROVIDER_NAME, &generate.response, answers)
    }
}

// Ollama generate API types

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    system: &'a str,
    format: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    #[allow(dead_code)]
    done: bool,
}
