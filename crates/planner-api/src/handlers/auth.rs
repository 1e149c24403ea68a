//! Account and token handlers.

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use planner_core::{Credentials, TokenResponse, User};

use crate::{auth::RequireAuth, error::ErrorBody, ApiError, ApiJson, AppState};

/// Create an account.
#[utoipa::path(post, path = "/api/v1/auth/register", tag = "Auth",
    request_body = Credentials,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid username or password", body = ErrorBody),
        (status = 409, description = "Username taken", body = ErrorBody)
    ))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(creds): ApiJson<Credentials>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state
        .db
        .users
        .create(creds.username.trim(), &creds.password)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange a username and password for a bearer token.
#[utoipa::path(post, path = "/api/v1/auth/token", tag = "Auth",
    request_body = Credentials,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Bad credentials", body = ErrorBody)
    ))]
pub async fn issue_token(
    State(state): State<AppState>,
    ApiJson(creds): ApiJson<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state
        .db
        .users
        .verify_credentials(creds.username.trim(), &creds.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Incorrect username or password".to_string()))?;

    let (token, record) = state.db.tokens.issue(user.id, state.token_lifetime).await?;
    info!(subsystem = "api", op = "issue_token", user_id = %user.id, "Issued token");

    let expires_in = (record.expires_at - record.created_at).num_seconds();
    Ok(Json(TokenResponse::bearer(token, expires_in)))
}

/// Revoke the presented token.
#[utoipa::path(post, path = "/api/v1/auth/revoke", tag = "Auth",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer" = [])))]
pub async fn revoke_token(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<StatusCode, ApiError> {
    state.db.tokens.revoke(&auth.token).await?;
    info!(subsystem = "api", op = "revoke_token", user_id = %auth.user_id, "Revoked token");
    Ok(StatusCode::NO_CONTENT)
}

/// The account behind the presented token.
#[utoipa::path(get, path = "/api/v1/auth/me", tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer" = [])))]
pub async fn me(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<User>, ApiError> {
    let user = state
        .db
        .users
        .get(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", auth.username)))?;
    Ok(Json(user))
}
