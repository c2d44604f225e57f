//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache engine and its admin API.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Non-positive TTL, zero version or similar bad write options
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Empty or oversized key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalidation pattern that does not compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Key not present (admin API only; the engine returns `None`)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Fetcher failure during a refresh
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidOptions(_)
            | CacheError::InvalidKey(_)
            | CacheError::InvalidPattern(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
