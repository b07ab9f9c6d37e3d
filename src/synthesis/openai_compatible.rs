//! OpenAI-compatible synthesis provider.
//!
//! Connects to any endpoint that implements the OpenAI Chat Completions API,
//! such as vLLM, LiteLLM, Together, or Ollama's OpenAI-format port. Requests
//! `response_format: json_object` so the completion is a bare JSON object.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::OpenAiCompatibleConfig;
use crate::error::SynthesisError;
use crate::persona::{QuestionnaireAnswers, SoulDeepPersona};
use crate::synthesis::prompt::{SYSTEM_PROMPT, user_prompt};
use crate::synthesis::{Synthesizer, parse_persona_response};

/// Provider name constant to avoid magic strings.
const PROVIDER_NAME: &str = "openai_compatible";

/// Structured output keeps the model analytical rather than creative.
const SYNTHESIS_TEMPERATURE: f32 = 0.3;

/// Persona synthesizer for OpenAI-compatible Chat Completions endpoints.
pub struct OpenAiCompatibleSynthesizer {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleSynthesizer {
    /// Create a new OpenAI-compatible synthesizer.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| SynthesisError::RequestFailed {
                provider: PROVIDER_NAME.to_string(),
                reason: format!("Failed to build reqwest client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// Construct API URL for a given path.
    /// Uses the base_url as-is and appends `/v1/{path}`.
    /// Strips trailing `/v1` from base_url to avoid double `/v1` issues.
    fn api_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let base = base.strip_suffix("/v1").unwrap_or(base);
        format!("{}/v1/{}", base, path.trim_start_matches('/'))
    }

    /// Add Authorization header if an API key is configured.
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key.as_ref() {
            Some(key) => request.header("Authorization", format!("Bearer {}", key.expose_secret())),
            None => request,
        }
    }
}

#[async_trait]
impl Synthesizer for OpenAiCompatibleSynthesizer {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn synthesize(
        &self,
        answers: &QuestionnaireAnswers,
    ) -> Result<SoulDeepPersona, SynthesisError> {
        let url = self.api_url("chat/completions");
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatCompletionMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatCompletionMessage {
                    role: "user",
                    content: user_prompt(answers),
                },
            ],
            temperature: SYNTHESIS_TEMPERATURE,
            response_format: ResponseFormat { format_type: "json_object" },
        };

        tracing::debug!(%url, model = %self.config.model, "Sending synthesis request");

        let http_request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request);
        let http_request = self.add_auth_header(http_request);

        let response = http_request.send().await.map_err(|e| {
            tracing::error!("OpenAI-compatible request failed: {}", e);
            SynthesisError::Unavailable {
                provider: PROVIDER_NAME.to_string(),
                reason: e.to_string(),
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

        tracing::debug!(%status, "OpenAI-compatible response received");

        if !status.is_success() {
            if status.as_u16() == 401 {
                return Err(SynthesisError::AuthFailed {
                    provider: PROVIDER_NAME.to_string(),
                });
            }
            if status.as_u16() == 429 {
                return Err(SynthesisError::RateLimited {
                    provider: PROVIDER_NAME.to_string(),
                    retry_after: None,
                });
            }
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

        let completion: ChatCompletionResponse =
            serde_json::from_str(&response_text).map_err(|e| SynthesisError::InvalidResponse {
                provider: PROVIDER_NAME.to_string(),
                reason: format!(
                    "JSON parse error: {}. Raw: {}",
                    e,
                    &response_text[..response_text.len().min(200)]
                ),
            })?;

        let choice = completion.choices.into_iter().next().ok_or_else(|| {
            SynthesisError::InvalidResponse {
                provider: PROVIDER_NAME.to_string(),
                reason: "No choices in response".to_string(),
            }
        })?;

        let content = choice.message.content.unwrap_or_default();
        parse_persona_response(PROVIDER_NAME, &content, answers)
    }
}

// OpenAI-compatible Chat Completions API types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatCompletionMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponseMessage {
    content: Option<String>,
}
