//! Saved to-do list handlers.
//!
//! All routes require a bearer token and only ever touch the caller's rows.

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use planner_core::{RawTodoItem, StoredTodo, TodoItem, TodoRepository};

use crate::{auth::RequireAuth, error::ErrorBody, ApiError, ApiJson, ApiPath, AppState};

/// Request body for `PUT /api/v1/todos`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ReplaceTodosRequest {
    pub todos: Vec<RawTodoItem>,
}

/// Request body for `PATCH /api/v1/todos/{id}/status`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    pub status: bool,
}

/// Validate every item, failing on the first bad one.
fn validate_items(raw: Vec<RawTodoItem>) -> Result<Vec<TodoItem>, ApiError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, item)| {
            TodoItem::try_from(item)
                .map_err(|e| ApiError::BadRequest(format!("todos[{}]: {}", index, e)))
        })
        .collect()
}

/// List the caller's saved todos in position order.
#[utoipa::path(get, path = "/api/v1/todos", tag = "Todos",
    responses(
        (status = 200, description = "Saved todos", body = Vec<StoredTodo>),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer" = [])))]
pub async fn list_todos(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<Vec<StoredTodo>>, ApiError> {
    let todos = state.db.todos.list(auth.user_id).await?;
    Ok(Json(todos))
}

/// Replace the caller's saved list.
#[utoipa::path(put, path = "/api/v1/todos", tag = "Todos",
    request_body = ReplaceTodosRequest,
    responses(
        (status = 200, description = "Stored todos", body = Vec<StoredTodo>),
        (status = 400, description = "An item failed validation", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer" = [])))]
pub async fn replace_todos(
    State(state): State<AppState>,
    auth: RequireAuth,
    ApiJson(req): ApiJson<ReplaceTodosRequest>,
) -> Result<Json<Vec<StoredTodo>>, ApiError> {
    let items = validate_items(req.todos)?;
    let stored = state.db.todos.replace_all(auth.user_id, &items).await?;
    Ok(Json(stored))
}

/// Mark one of the caller's todos complete or incomplete.
#[utoipa::path(patch, path = "/api/v1/todos/{id}/status", tag = "Todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated todo", body = StoredTodo),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such todo for this user", body = ErrorBody)
    ),
    security(("bearer" = [])))]
pub async fn update_todo_status(
    State(state): State<AppState>,
    auth: RequireAuth,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> Result<Json<StoredTodo>, ApiError> {
    let todo = state
        .db
        .todos
        .update_status(auth.user_id, id, req.status)
        .await?;
    Ok(Json(todo))
}
