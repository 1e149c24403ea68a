//! Inference backend selection.
//!
//! Configuration is read once from the environment at start-up:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PLANNER_INFERENCE_BACKEND` | `openai` (`openai` or `ollama`) |
//! | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
//! | `OPENAI_API_KEY` | unset |
//! | `OPENAI_GEN_MODEL` | `gpt-4o-mini` |
//! | `OLLAMA_BASE` | `http://127.0.0.1:11434` |
//! | `OLLAMA_GEN_MODEL` | `llama3.1:8b` |
//! | `PLANNER_GEN_TIMEOUT_SECS` | `120` |
//!
//! # Example
//!
//! ```rust,no_run
//! use planner_inference::config::InferenceConfig;
//!
//! let config = InferenceConfig::from_env().expect("invalid inference config");
//! let backend = config.build_backend().expect("failed to build backend");
//! println!("using {}", backend.model_name());
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use planner_core::GenerationBackend;

use crate::ollama::{OllamaBackend, OllamaConfig};
use crate::openai::{OpenAIBackend, OpenAIConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid backend: {0} (expected 'openai' or 'ollama')")]
    InvalidBackend(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for planner_core::Error {
    fn from(e: ConfigError) -> Self {
        planner_core::Error::Config(e.to_string())
    }
}

/// Inference backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InferenceBackend {
    #[default]
    OpenAI,
    Ollama,
}

impl FromStr for InferenceBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            _ => Err(ConfigError::InvalidBackend(s.to_string())),
        }
    }
}

impl fmt::Display for InferenceBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAI => write!(f, "openai"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

/// Main inference configuration.
#[derive(Debug, Clone, Default)]
pub struct InferenceConfig {
    /// Backend to use for generation.
    pub backend: InferenceBackend,
    pub openai: OpenAIConfig,
    pub ollama: OllamaConfig,
}

impl InferenceConfig {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        let backend = match std::env::var("PLANNER_INFERENCE_BACKEND") {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => InferenceBackend::default(),
        };

        let config = Self {
            backend,
            openai: OpenAIConfig::from_env(),
            ollama: OllamaConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the settings of the selected backend.
    pub fn validate(&self) -> ConfigResult<()> {
        match self.backend {
            InferenceBackend::OpenAI => self.openai.validate(),
            InferenceBackend::Ollama => self.ollama.validate(),
        }
    }

    /// Construct the selected generation backend.
    pub fn build_backend(&self) -> planner_core::Result<Arc<dyn GenerationBackend>> {
        self.validate()?;
        let backend: Arc<dyn GenerationBackend> = match self.backend {
            InferenceBackend::OpenAI => Arc::new(OpenAIBackend::new(self.openai.clone())?),
            InferenceBackend::Ollama => Arc::new(OllamaBackend::new(self.ollama.clone())?),
        };
        info!(
            subsystem = "inference",
            provider = %self.backend,
            model = backend.model_name(),
            "Generation backend ready"
        );
        Ok(backend)
    }
}
