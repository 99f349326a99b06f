//! Error types for the RAG pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration (bad chunk/overlap parameters, bad address).
    /// Fatal at startup, not recoverable per-call.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed query input (empty question, zero top_k)
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Embedding backend unreachable or failed
    #[error("Embedding backend unavailable: {0}")]
    Embedding(String),

    /// Generation backend unreachable or failed.
    /// Recovered locally via the degraded answer path for queries.
    #[error("Generation backend unavailable: {0}")]
    Generation(String),

    /// Vector index storage or lookup failure
    #[error("Vector index error: {0}")]
    Index(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal invariant violation (e.g. chunk/vector count mismatch)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create a vector index error
    pub fn index(message: impl Into<String>) -> Self {
        Self::Index(message.into())
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
            Error::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, "invalid_query", msg.clone()),
            Error::Embedding(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "embedding_unavailable", msg.clone())
            }
            Error::Generation(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "generation_unavailable", msg.clone())
            }
            Error::Index(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "index_error", msg.clone())
            }
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
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
