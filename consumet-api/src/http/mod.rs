// Module: http
// HTTP/JSON API over the content service

pub mod content;
pub mod error;
pub mod health;
pub mod providers;

use axum::{http::HeaderValue, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use consumet_core::{cache::ResultCache, service::ContentService};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentService>,
    pub cache: ResultCache,
}

impl AppState {
    #[must_use]
    pub fn from_services(services: &consumet_core::bootstrap::Services) -> Self {
        Self {
            content: services.content.clone(),
            cache: services.cache.clone(),
        }
    }
}

/// Build the CORS layer; `*` (or an empty list) allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(parsed)
}

/// Create the HTTP router
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let router = Router::new()
        .merge(health::create_health_router())
        .merge(providers::create_providers_router())
        .merge(content::create_content_router());

    // Apply layers before state
    let router = router
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http());

    // Apply state to all routes (must be last)
    router.with_state(state)
}
