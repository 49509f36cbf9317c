use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::db::DbError;

/// Error surface of the API: invalid login, missing resource on a
/// single-item fetch, and everything else collapsed into a 500 with a
/// fixed per-route message. Diagnostic detail stays in the server log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Invalid credentials")]
    Unauthorized,
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Logs the underlying failure and hides it behind the route's message.
    pub fn internal(message: &'static str, err: DbError) -> Self {
        error!("{}: {}", message, err);
        ApiError::Internal(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
