//! Provider listing
//!
//! `GET /providers?type=ANIME` returns `{type, providers}`: the enabled
//! providers of a domain in fallback order.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use consumet_core::provider::{ContentDomain, ProviderDescriptor};

use super::{AppError, AppResult, AppState};

pub fn create_providers_router() -> Router<AppState> {
    Router::new().route("/providers", get(list_providers))
}

#[derive(Debug, Deserialize)]
pub struct ProvidersQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    #[serde(rename = "type")]
    pub kind: ContentDomain,
    pub providers: Vec<ProviderDescriptor>,
}

fn valid_types() -> String {
    ContentDomain::ALL
        .iter()
        .map(|d| d.type_name())
        .collect::<Vec<_>>()
        .join(",")
}

pub async fn list_providers(
    State(state): State<AppState>,
    Query(query): Query<ProvidersQuery>,
) -> AppResult<Json<ProvidersResponse>> {
    let Some(kind) = query.kind.filter(|k| !k.trim().is_empty()) else {
        return Err(AppError::bad_request(format!(
            "Type must not be empty. Available types: {}",
            valid_types()
        )));
    };

    // Only the upper-case listing names are accepted here
    let domain = ContentDomain::ALL
        .into_iter()
        .find(|d| d.type_name() == kind.trim())
        .ok_or_else(|| {
            AppError::bad_request(format!(
                "Type must be either: {}",
                valid_types()
            ))
        })?;

    Ok(Json(ProvidersResponse {
        kind: domain,
        providers: state.content.providers(domain),
    }))
}
