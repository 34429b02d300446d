//! Content resolution endpoints
//!
//! - `GET /{domain}/watch/{episodeId}?provider=&server=&dub=`
//! - `GET /{domain}/episodes/{id}?provider=&dub=&fetchFiller=`
//! - `GET /{domain}/info/{id}?provider=&dub=&fetchFiller=`
//! - `GET /{domain}/search/{query}?provider=&page=`

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use consumet_core::provider::ContentDomain;
use consumet_core::resolution::{parse_flag, ProviderFailure, Resolution, ResolutionRequest, SearchRequest};

use super::{AppError, AppResult, AppState};

const NO_PLAYABLE_SOURCE: &str = "No playable source found from available providers";
const NO_RESULT: &str = "No provider returned a usable result";

pub fn create_content_router() -> Router<AppState> {
    Router::new()
        .route("/{domain}/watch/{id}", get(watch))
        .route("/{domain}/episodes/{id}", get(episodes))
        .route("/{domain}/info/{id}", get(info))
        .route("/{domain}/search/{query}", get(search))
}

#[derive(Debug, Default, Deserialize)]
pub struct ResolveQuery {
    pub provider: Option<String>,
    pub server: Option<String>,
    pub dub: Option<String>,
    #[serde(rename = "fetchFiller")]
    pub fetch_filler: Option<String>,
}

impl ResolveQuery {
    fn into_request(self, id: String) -> ResolutionRequest {
        ResolutionRequest::new(id)
            .with_provider(self.provider)
            .with_server(self.server)
            .dub(parse_flag(self.dub.as_deref()))
            .fetch_filler(parse_flag(self.fetch_filler.as_deref()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub provider: Option<String>,
    pub page: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolvedBody<T> {
    provider_used: String,
    #[serde(flatten)]
    value: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ProviderFailure>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExhaustedBody {
    message: &'static str,
    tried_providers: Vec<String>,
    errors: Vec<ProviderFailure>,
}

/// 200 with the winning value, or 404 listing every provider tried
fn into_response<T: Serialize>(resolution: Resolution<T>, exhausted_message: &'static str) -> Response {
    match resolution {
        Resolution::Resolved(resolved) => Json(ResolvedBody {
            provider_used: resolved.provider_used,
            value: resolved.value,
            errors: resolved.errors,
        })
        .into_response(),
        Resolution::Exhausted {
            tried_providers,
            errors,
        } => (
            StatusCode::NOT_FOUND,
            Json(ExhaustedBody {
                message: exhausted_message,
                tried_providers,
                errors,
            }),
        )
            .into_response(),
    }
}

fn parse_domain(raw: &str) -> AppResult<ContentDomain> {
    raw.parse()
        .map_err(|_| AppError::not_found(format!("Unknown content domain: {raw}")))
}

pub async fn watch(
    State(state): State<AppState>,
    Path((domain, id)): Path<(String, String)>,
    Query(query): Query<ResolveQuery>,
) -> AppResult<Response> {
    let domain = parse_domain(&domain)?;
    let request = query.into_request(id);
    let resolution = state.content.watch(domain, &request).await?;
    Ok(into_response(resolution, NO_PLAYABLE_SOURCE))
}

pub async fn episodes(
    State(state): State<AppState>,
    Path((domain, id)): Path<(String, String)>,
    Query(query): Query<ResolveQuery>,
) -> AppResult<Response> {
    let domain = parse_domain(&domain)?;
    let request = query.into_request(id);
    let resolution = state.content.episodes(domain, &request).await?;
    Ok(into_response(resolution, NO_RESULT))
}

pub async fn info(
    State(state): State<AppState>,
    Path((domain, id)): Path<(String, String)>,
    Query(query): Query<ResolveQuery>,
) -> AppResult<Response> {
    let domain = parse_domain(&domain)?;
    let request = query.into_request(id);
    let resolution = state.content.info(domain, &request).await?;
    Ok(into_response(resolution, NO_RESULT))
}

pub async fn search(
    State(state): State<AppState>,
    Path((domain, text)): Path<(String, String)>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Response> {
    let domain = parse_domain(&domain)?;
    let page = query
        .page
        .as_deref()
        .map(str::parse::<u32>)
        .transpose()
        .map_err(|_| AppError::bad_request("page must be a positive integer"))?;

    let request = SearchRequest::new(text).page(page).with_provider(query.provider);
    let resolution = state.content.search(domain, &request).await?;
    Ok(into_response(resolution, NO_RESULT))
}
