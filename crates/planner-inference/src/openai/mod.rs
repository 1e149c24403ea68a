//! OpenAI-compatible inference backend.
//!
//! Works with any endpoint implementing the chat-completions API, including:
//!
//! - OpenAI cloud API
//! - OpenRouter
//! - Gemini's OpenAI-compatible endpoint
//! - vLLM, LocalAI, LM Studio
//!
//! # Example
//!
//! ```rust,no_run
//! use planner_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use planner_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = OpenAIConfig {
//!         base_url: "http://localhost:8080/v1".to_string(),
//!         api_key: None,
//!         gen_model: "llama3".to_string(),
//!         ..Default::default()
//!     };
//!     let backend = OpenAIBackend::new(config).unwrap();
//!     let text = backend.generate("Hello").await.unwrap();
//!     println!("{}", text);
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{OpenAIBackend, OpenAIConfig, DEFAULT_GEN_MODEL, DEFAULT_OPENAI_URL};
pub use error::{to_planner_error, OpenAIErrorCode};
pub use types::*;
