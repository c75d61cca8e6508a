//! API Handlers
//!
//! HTTP request handlers for the demo server. The report endpoint is memoized
//! by its full request URI.

use axum::{
    extract::{Path, State},
    http::Uri,
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::gateway::MemoGateway;
use crate::models::{HealthResponse, InvalidateRequest, InvalidateResponse, ReportResponse};

/// Application state shared across all handlers.
///
/// Contains the memoization gateway, which owns the shared cache store.
#[derive(Clone)]
pub struct AppState {
    /// Gateway over the thread-safe cache store
    pub gateway: MemoGateway,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: CacheStore) -> Self {
        Self {
            gateway: MemoGateway::new(cache.into_shared()),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheStore::from_config(config))
    }
}

/// Derives the cache key for a request: path plus query string.
pub fn request_key(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Handler for GET /report/:name
///
/// Serves a memoized report. Requests with the same path and query share one
/// cached result until it expires.
pub async fn report_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    uri: Uri,
) -> Result<Response> {
    let key = request_key(&uri);

    state
        .gateway
        .handle_default(
            &key,
            || build_report(name),
            |report: ReportResponse| async move { Ok(Json(report).into_response()) },
        )
        .await
}

async fn build_report(name: String) -> anyhow::Result<ReportResponse> {
    if name.starts_with("error") {
        anyhow::bail!("no report available for '{}'", name);
    }
    Ok(ReportResponse::generate(name))
}

/// Handler for DELETE /cache
///
/// Drops a memoized response so the next request recomputes it.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let removed = state.gateway.invalidate(&req.key).await;

    Ok(Json(InvalidateResponse::new(req.key, removed)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
