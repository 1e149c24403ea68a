//! Core traits for smart-planner collaborators.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;

    /// Short provider identifier ("openai", "ollama", "mock").
    fn provider_name(&self) -> &'static str;

    /// Check if the backend is available and responding.
    async fn health_check(&self) -> Result<bool>;
}

// =============================================================================
// TODO REPOSITORY TRAITS
// =============================================================================

/// Persistence for a user's saved to-do list.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Replace the user's whole list with `items`, preserving their order.
    ///
    /// Runs in a single transaction; saving the same batch twice leaves the
    /// same list behind.
    async fn replace_all(&self, user_id: Uuid, items: &[TodoItem]) -> Result<Vec<StoredTodo>>;

    /// List the user's todos in position order.
    async fn list(&self, user_id: Uuid) -> Result<Vec<StoredTodo>>;

    /// Set the completion status of one of the user's todos.
    ///
    /// Returns `Error::NotFound` when the todo does not exist or belongs to
    /// another user.
    async fn update_status(&self, user_id: Uuid, todo_id: Uuid, status: bool)
        -> Result<StoredTodo>;
}
