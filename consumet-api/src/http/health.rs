//! Health check endpoints
//!
//! Provides simple health check for monitoring.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use crate::http::AppState;

/// Health check router
pub fn create_health_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/cache", get(cache_status))
}

/// Liveness check; answers whenever the server is running
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Which cache backend is serving results
pub async fn cache_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "backend": state.cache.backend_name(),
        "enabled": state.cache.is_enabled(),
    }))
}
