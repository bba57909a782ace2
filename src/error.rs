use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Request-level failures, converted to a `{message}` JSON body plus status
/// at the handler boundary. Raw causes stay in the logs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Username already exists")]
    DuplicateHandle,
    // One message for unknown handle and wrong password, so the response
    // cannot be used to enumerate handles.
    #[error("Invalid username or password")]
    AuthenticationFailure,
    #[error("User not found")]
    NotFound,
    #[error("Something went wrong, please try again")]
    Persistence(#[source] sqlx::Error),
    #[error("Something went wrong, please try again")]
    Internal(anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Persistence(e)
    }
}

// Malformed or incomplete request bodies are validation failures like any
// other, not the extractor's default plain-text 422.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::DuplicateHandle => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailure => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Persistence(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Persistence(e) => error!(error = %e, "persistence failure"),
            ApiError::Internal(e) => error!(error = %e, "internal failure"),
            _ => {}
        }
        let body = Json(json!({ "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}
