//! # planner-api
//!
//! axum HTTP service for smart-planner: free-text extraction, saved to-do
//! lists and bearer-token authentication.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, FromRequest, FromRequestParts},
    http::{header, Method},
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use planner_core::{logging, GenerationBackend};
use planner_db::Database;

pub use config::ServerConfig;
pub use error::ApiError;

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn GenerationBackend>,
    pub db: Database,
    /// Lifetime of newly issued bearer tokens.
    pub token_lifetime: chrono::Duration,
}

impl AppState {
    pub fn new(backend: Arc<dyn GenerationBackend>, db: Database, config: &ServerConfig) -> Self {
        Self {
            backend,
            db,
            token_lifetime: config.token_lifetime(),
        }
    }
}

/// JSON body extractor whose rejections render as `{detail}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections render as `{detail}`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "smart-planner API",
        description = "Turns free-text messages into structured to-do lists"
    ),
    paths(
        handlers::health::health_check,
        handlers::extract::todo_request,
        handlers::todos::list_todos,
        handlers::todos::replace_todos,
        handlers::todos::update_todo_status,
        handlers::auth::register,
        handlers::auth::issue_token,
        handlers::auth::revoke_token,
        handlers::auth::me,
    ),
    components(schemas(
        planner_core::TodoItem,
        planner_core::RawTodoItem,
        planner_core::Priority,
        planner_core::ExtractionResult,
        planner_core::StoredTodo,
        planner_core::User,
        planner_core::Credentials,
        planner_core::TokenResponse,
        error::ErrorBody,
        handlers::health::HealthResponse,
        handlers::extract::TodoRequest,
        handlers::todos::ReplaceTodosRequest,
        handlers::todos::UpdateStatusRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Todos", description = "Extraction and saved to-do lists"),
        (name = "Auth", description = "Accounts and bearer tokens"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.cors_origins()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Span for one HTTP request, tagged with its correlation id.
fn request_span<B>(request: &axum::http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        { logging::REQUEST_ID } = %request_id,
    )
}

/// Build the full router with middleware.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    use handlers::{auth, extract, health, todos};

    Router::new()
        .route("/health", get(health::health_check))
        .route("/todo-request", post(extract::todo_request))
        .route(
            "/api/v1/todos",
            get(todos::list_todos).put(todos::replace_todos),
        )
        .route("/api/v1/todos/:id/status", patch(todos::update_todo_status))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/token", post(auth::issue_token))
        .route("/api/v1/auth/revoke", post(auth::revoke_token))
        .route("/api/v1/auth/me", get(auth::me))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(config))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .with_state(state)
}
