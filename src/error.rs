//! Error types for the memo cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Boxed error produced by a caller-supplied callback.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// == Cache Error Enum ==
/// Unified error type for the cache store and the memoization gateway.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Time-to-live exceeded
    #[error("Key expired: {0}")]
    Expired(String),

    /// Hit limit exceeded
    #[error("Key hit limit reached: {0}")]
    CountExpired(String),

    /// Cache is at capacity and the full policy rejects new keys
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// The compute callback failed; nothing was cached
    #[error("Compute failed: {0}")]
    ComputeFailed(#[source] BoxError),

    /// The emit callback failed
    #[error("Emit failed: {0}")]
    EmitFailed(#[source] BoxError),

    /// A result could not be encoded into a payload
    #[error("Encode failed: {0}")]
    EncodeFailed(String),

    /// A stored payload could not be decoded
    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Returns true for lookup outcomes that a memoizing caller treats as a miss.
    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            CacheError::NotFound(_) | CacheError::Expired(_) | CacheError::CountExpired(_)
        )
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) | CacheError::Expired(_) | CacheError::CountExpired(_) => {
                StatusCode::NOT_FOUND
            }
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::CacheFull(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::ComputeFailed(_)
            | CacheError::EmitFailed(_)
            | CacheError::EncodeFailed(_)
            | CacheError::DecodeFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the memo cache.
pub type Result<T> = std::result::Result<T, CacheError>;
