//! Bearer token extractors.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::error;
use uuid::Uuid;

use planner_core::AuthPrincipal;

use crate::{ApiError, AppState};

/// Pull the bearer token out of an `Authorization` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Extractor for optionally authenticated requests.
///
/// A missing, malformed, unknown, revoked or expired token resolves to
/// [`AuthPrincipal::Anonymous`]. Rejects only when the token store fails.
#[derive(Debug, Clone)]
pub struct Auth {
    pub principal: AuthPrincipal,
    /// The presented token, if it resolved to a user.
    pub token: Option<String>,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token);

        let Some(token) = token else {
            return Ok(Auth {
                principal: AuthPrincipal::Anonymous,
                token: None,
            });
        };

        match state.db.tokens.validate(token).await {
            Ok(Some(principal)) => Ok(Auth {
                principal,
                token: Some(token.to_string()),
            }),
            Ok(None) => Ok(Auth {
                principal: AuthPrincipal::Anonymous,
                token: None,
            }),
            Err(e) => {
                error!(
                    subsystem = "api",
                    component = "auth",
                    error = %e,
                    "Token validation failed"
                );
                Err(e.into())
            }
        }
    }
}

/// Extractor that requires a valid bearer token.
#[derive(Debug, Clone)]
pub struct RequireAuth {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = Auth::from_request_parts(parts, state).await?;

        match (auth.principal, auth.token) {
            (AuthPrincipal::User { user_id, username }, Some(token)) => Ok(RequireAuth {
                user_id,
                username,
                token,
            }),
            _ => Err(ApiError::Unauthorized(
                "Authentication required".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer sp_at_abc"), Some("sp_at_abc"));
        assert_eq!(bearer_token("Bearer   sp_at_abc  "), Some("sp_at_abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("sp_at_abc"), None);
    }
}
