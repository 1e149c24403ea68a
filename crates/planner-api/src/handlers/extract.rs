//! Free-text to to-do extraction.

use std::time::Instant;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use planner_core::{AuthPrincipal, ExtractionResult, TodoRepository};
use planner_inference::{build_prompt, extract, SYSTEM_PROMPT};

use crate::{auth::Auth, error::ErrorBody, ApiError, ApiJson, AppState};

/// Request body for `POST /todo-request`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TodoRequest {
    /// Free-text message, e.g. "buy milk tomorrow and call mom".
    pub message: String,
}

/// Extract to-do items from a message.
///
/// The message is sent to the configured model together with today's date.
/// When the caller is authenticated the extracted list also replaces their
/// saved list.
#[utoipa::path(post, path = "/todo-request", tag = "Todos",
    request_body = TodoRequest,
    responses(
        (status = 200, description = "Extracted todos", body = ExtractionResult),
        (status = 400, description = "Malformed request body", body = ErrorBody),
        (status = 422, description = "No JSON object in model output", body = ErrorBody),
        (status = 502, description = "Model output was malformed", body = ErrorBody),
        (status = 503, description = "Model unavailable", body = ErrorBody),
        (status = 500, description = "Token store unavailable", body = ErrorBody)
    ),
    security((), ("bearer" = [])))]
pub async fn todo_request(
    State(state): State<AppState>,
    auth: Auth,
    ApiJson(req): ApiJson<TodoRequest>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let start = Instant::now();
    let today = chrono::Local::now().date_naive();
    let prompt = build_prompt(&req.message, today);

    let raw = state
        .backend
        .generate_with_system(SYSTEM_PROMPT, &prompt)
        .await?;
    let result = extract(&req.message, &raw)?;

    if let AuthPrincipal::User { user_id, .. } = &auth.principal {
        state.db.todos.replace_all(*user_id, result.todos()).await?;
    }

    info!(
        subsystem = "api",
        op = "todo_request",
        provider = state.backend.provider_name(),
        prompt_len = prompt.len(),
        response_len = raw.len(),
        todo_count = result.todo_count(),
        saved = auth.principal.is_authenticated(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Extracted todos"
    );

    Ok(Json(result))
}
