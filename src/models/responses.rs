//! Response DTOs for the demo server
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

/// Response body for the memoized report endpoint (GET /report/:name)
///
/// Also the value stored in the cache, so it round-trips through the codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    /// Subject of the report
    pub name: String,
    /// Greeting built for the subject
    pub greeting: String,
    /// Number of characters in the name
    pub letters: usize,
    /// When the report was computed, ISO 8601
    pub generated_at: String,
}

impl ReportResponse {
    /// Builds a report for `name`, stamped with the current time
    pub fn generate(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            greeting: format!("Hello, {}!", name),
            letters: name.chars().count(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            name,
        }
    }
}

/// Response body for cache invalidation (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Human-readable outcome
    pub message: String,
    /// The key that was targeted
    pub key: String,
    /// Whether a memoized entry existed and was removed
    pub removed: bool,
}

impl InvalidateResponse {
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        let key = key.into();
        let message = if removed {
            format!("Key '{}' invalidated", key)
        } else {
            format!("Key '{}' was not cached", key)
        };
        Self {
            message,
            key,
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
