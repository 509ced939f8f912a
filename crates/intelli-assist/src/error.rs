//! Error types for the assistant

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, Error>;

/// Assistant errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Online summary lookup error
    #[error("Summary lookup failed: {0}")]
    Summary(String),

    /// Geocoding error
    #[error("Places lookup failed: {0}")]
    Places(String),

    /// Rejected user query
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Page rendering error
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a summary error
    pub fn summary(message: impl Into<String>) -> Self {
        Self::Summary(message.into())
    }

    /// Create a places error
    pub fn places(message: impl Into<String>) -> Self {
        Self::Places(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::Embedding(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error", msg.clone())
            }
            Error::Summary(msg) => (StatusCode::BAD_GATEWAY, "summary_error", msg.clone()),
            Error::Places(msg) => (StatusCode::BAD_GATEWAY, "places_error", msg.clone()),
            Error::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, "invalid_query", msg.clone()),
            Error::Template(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "template_error",
                err.to_string(),
            ),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Toml(err) => (StatusCode::BAD_REQUEST, "config_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
