//! HTTP error mapping.
//!
//! Every failure leaves the service as `{"detail": "..."}` with a status that
//! identifies its category.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Error body returned by every endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// 400
    BadRequest(String),
    /// 401
    Unauthorized(String),
    /// 404
    NotFound(String),
    /// 409
    Conflict(String),
    /// 422: the model's output held no JSON object.
    Unprocessable(String),
    /// 502: the model answered with unusable content.
    BadGateway(String),
    /// 503: the model could not be reached.
    ServiceUnavailable(String),
    /// 500
    Internal(planner_core::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<planner_core::Error> for ApiError {
    fn from(err: planner_core::Error) -> Self {
        use planner_core::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            Error::Extraction(msg) => ApiError::Unprocessable(msg),
            // The candidate was already logged by the extractor.
            Error::Parse { reason, .. } => {
                ApiError::BadGateway(format!("Model returned malformed output: {}", reason))
            }
            Error::Inference(msg) | Error::Request(msg) => {
                ApiError::ServiceUnavailable(format!("Model unavailable: {}", msg))
            }
            other => ApiError::Internal(other),
        }
    }
}

impl From<planner_inference::ExtractionError> for ApiError {
    fn from(err: planner_inference::ExtractionError) -> Self {
        planner_core::Error::from(err).into()
    }
}

// Body rejections are all 400; 422 belongs to extraction.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::Internal(err) => {
                // Internals stay in the log.
                error!(subsystem = "api", error = %err, "Request failed");
                "Internal server error".to_string()
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::BadGateway(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}
