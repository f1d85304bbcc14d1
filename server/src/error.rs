//! Error types for the todo server.
//!
//! `AppError` is what handlers return; each variant maps to one HTTP status
//! and a plain-text body. `ConfigError` and `ServerError` only surface at
//! startup.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing 'id' parameter")]
    MissingId,

    #[error("Invalid 'id' parameter")]
    InvalidId,

    #[error("Error decoding request body")]
    InvalidBody(#[source] serde_json::Error),

    #[error("todo with id {0} not found")]
    NotFound(i64),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingId | AppError::InvalidId | AppError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::InvalidBody(source) => {
                tracing::debug!(error = %source, "rejected request body");
            }
            other => tracing::debug!(error = %other, "request failed"),
        }
        (self.status(), self.to_string()).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid HOST {value:?}: {source}")]
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("invalid PORT {value:?}: {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("invalid TODO_ID_SCHEME {0:?}, expected `monotonic` or `last-plus-one`")]
    InvalidIdScheme(String),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
