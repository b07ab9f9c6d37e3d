//! Configuration for SoulDeep.
//!
//! Everything is loaded from environment variables (with `.env` support via
//! `dotenvy`). Missing credentials for the selected backend are a startup
//! failure, not a per-request failure.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Main configuration for the service.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            llm: LlmConfig::from_env()?,
            store: StoreConfig::from_env()?,
        })
    }
}

/// Which LLM backend synthesizes personas.
///
/// Defaults to `Ollama` so the service works against a local model with no
/// credentials. Override with `SOULDEEP_LLM_BACKEND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    /// Local Ollama instance (`/api/generate` with JSON format).
    #[default]
    Ollama,
    /// Any OpenAI-compatible endpoint (vLLM, LiteLLM, Together, ...).
    OpenAiCompatible,
}

impl std::str::FromStr for LlmBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai_compatible" | "openai-compatible" | "compatible" => Ok(Self::OpenAiCompatible),
            _ => Err(format!(
                "invalid LLM backend '{}', expected one of: ollama, openai_compatible",
                s
            )),
        }
    }
}

impl std::fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAiCompatible => write!(f, "openai_compatible"),
        }
    }
}

/// Configuration for local Ollama.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
}

/// Configuration for any OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub model: String,
}

/// LLM configuration: selected backend plus per-backend settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub ollama: Option<OllamaConfig>,
    pub openai_compatible: Option<OpenAiCompatibleConfig>,
}

impl LlmConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let backend = match optional_env("SOULDEEP_LLM_BACKEND")? {
            Some(raw) => raw
                .parse::<LlmBackend>()
                .map_err(|message| ConfigError::InvalidValue {
                    key: "SOULDEEP_LLM_BACKEND".to_string(),
                    message,
                })?,
            None => LlmBackend::default(),
        };

        // Only the selected backend's section is required to be complete.
        let ollama = match backend {
            LlmBackend::Ollama => Some(OllamaConfig {
                base_url: optional_env("OLLAMA_BASE_URL")?
                    .unwrap_or_else(|| "http://localhost:11434".to_string()),
                model: optional_env("OLLAMA_MODEL")?.unwrap_or_else(|| "phi3".to_string()),
            }),
            _ => None,
        };

        let openai_compatible = match backend {
            LlmBackend::OpenAiCompatible => {
                let base_url =
                    optional_env("LLM_BASE_URL")?.ok_or_else(|| ConfigError::MissingRequired {
                        key: "LLM_BASE_URL".to_string(),
                        hint: "Set LLM_BASE_URL to the endpoint root, e.g. https://api.together.xyz"
                            .to_string(),
                    })?;
                let model =
                    optional_env("LLM_MODEL")?.ok_or_else(|| ConfigError::MissingRequired {
                        key: "LLM_MODEL".to_string(),
                        hint: "Set LLM_MODEL to the model identifier for the endpoint".to_string(),
                    })?;
                let api_key = optional_env("LLM_API_KEY")?.map(SecretString::from);
                Some(OpenAiCompatibleConfig {
                    base_url,
                    api_key,
                    model,
                })
            }
            _ => None,
        };

        Ok(Self {
            backend,
            ollama,
            openai_compatible,
        })
    }
}

/// Persona store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the libSQL database file.
    pub path: PathBuf,
}

impl StoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let path = match optional_env("SOULDEEP_DB_PATH")? {
            Some(p) => PathBuf::from(p),
            None => default_db_path(),
        };
        Ok(Self { path })
    }
}

/// Default database path: `~/.souldeep/souldeep.db`.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".souldeep")
        .join("souldeep.db")
}

/// Read an optional environment variable, treating empty values as unset.
fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(v) if v.trim().is_empty() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::ParseError(format!(
            "environment variable {key} is not valid UTF-8"
        ))),
    }
}
