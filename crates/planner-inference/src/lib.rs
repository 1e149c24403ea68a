//! # planner-inference
//!
//! Everything between a user's free-text message and a validated list of
//! to-do items.
//!
//! This crate provides:
//! - The extraction prompt template ([`prompt`])
//! - The model-output extractor and validator ([`extraction`])
//! - Ollama and OpenAI-compatible generation backends
//! - Environment-driven backend selection ([`config`])
//! - A deterministic mock backend (feature `mock`)
//!
//! # Feature Flags
//!
//! - `mock`: Enable [`mock::MockGenerationBackend`] for downstream tests
//!
//! # Example
//!
//! ```rust,no_run
//! use planner_inference::{build_prompt, extract, InferenceConfig, SYSTEM_PROMPT};
//!
//! #[tokio::main]
//! async fn main() -> planner_core::Result<()> {
//!     let backend = InferenceConfig::from_env()?.build_backend()?;
//!     let message = "dentist tomorrow at 10";
//!     let today = chrono::Local::now().date_naive();
//!     let raw = backend
//!         .generate_with_system(SYSTEM_PROMPT, &build_prompt(message, today))
//!         .await?;
//!     let result = extract(message, &raw)?;
//!     println!("{} todos", result.todo_count());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod extraction;
pub mod ollama;
pub mod openai;
pub mod prompt;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use planner_core::*;

pub use config::{ConfigError, InferenceBackend, InferenceConfig};
pub use extraction::{
    extract, extract_todos, locate_json_object, strip_code_fences, ExtractionError,
};
pub use ollama::{OllamaBackend, OllamaConfig};
pub use openai::{OpenAIBackend, OpenAIConfig};
pub use prompt::{build_prompt, SYSTEM_PROMPT};
