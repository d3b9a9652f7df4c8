//! Handler failures and their JSON responses.
//!
//! Every error body is `{"error": <message>, "code": <CODE>}`. Rule
//! violations carry their own codes so the board can tell a full athlete
//! from an inactive event. Storage failures are logged and reported without
//! detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use trackmeet_core::error::CoreError;
use trackmeet_db::store::map_sqlx;

const HIDDEN_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Raised by repository lookups made directly from handlers.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request body failed field validation.
    #[error("Invalid request: {0}")]
    InvalidBody(#[from] validator::ValidationErrors),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl ErrorBody {
    fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }

    fn hidden() -> Self {
        Self::new("INTERNAL_ERROR", HIDDEN_MESSAGE)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Core(err) => core_response(&err),
            // A direct lookup that found nothing; the handler names no entity.
            AppError::Database(sqlx::Error::RowNotFound) => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("NOT_FOUND", "Resource not found"),
            ),
            AppError::Database(err) => core_response(&map_sqlx(err)),
            AppError::InvalidBody(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("VALIDATION_ERROR", errors.to_string()),
            ),
        };
        (status, Json(body)).into_response()
    }
}

fn core_response(err: &CoreError) -> (StatusCode, ErrorBody) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", format!("{entity} with id {id} not found")),
        ),
        CoreError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("VALIDATION_ERROR", msg.as_str()),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg.as_str())),
        CoreError::Unauthorized(msg) => (
            StatusCode::UNAUTHORIZED,
            ErrorBody::new("UNAUTHORIZED", msg.as_str()),
        ),
        CoreError::Forbidden(msg) => (
            StatusCode::FORBIDDEN,
            ErrorBody::new("FORBIDDEN", msg.as_str()),
        ),
        CoreError::Rule(rule) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorBody::new(rule.code(), rule.to_string()),
        ),
        CoreError::Persistence(msg) | CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::hidden())
        }
    }
}
