//! Request DTOs for the demo server
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for cache invalidation (DELETE /cache)
///
/// # Fields
/// - `key`: The memoized request URI to drop, e.g. `/report/alice?lang=en`
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// The cache key
    pub key: String,
}

impl InvalidateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if !self.key.starts_with('/') {
            return Some("Key must be a request URI starting with '/'".to_string());
        }
        None
    }
}
