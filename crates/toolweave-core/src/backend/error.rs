//! Model backend error types

use thiserror::Error;

/// Errors that can occur while talking to the model backend
///
/// These are never retried by the orchestrator; they surface to the caller
/// of `process_query` as they are.
#[derive(Error, Debug)]
pub enum BackendError {
    /// API request failed
    #[error("{backend} API error: {message}")]
    ApiError { backend: String, message: String },

    /// Invalid response from the backend
    #[error("Invalid response from {backend}: {message}")]
    InvalidResponse { backend: String, message: String },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request was cancelled
    #[error("Request cancelled")]
    Cancelled,

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl BackendError {
    /// Create an API error
    pub fn api_error(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ApiError {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            backend: backend.into(),
            message: message.into(),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
