//! Router-level tests: status codes and response bodies
//!
//! Run with: cargo test --test http_routes

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

use consumet_api::{create_router, AppState};
use consumet_core::cache::{KeyBuilder, MemoryBackend, ResultCache, TtlPolicy};
use consumet_core::provider::{
    AdapterFactory, Capability, ContentDomain, Episode, EpisodeList, Manifest, ProviderAdapter,
    ProviderDescriptor, ProviderError, ProviderRegistry, Source, StreamingServer, Variant,
};
use consumet_core::service::ContentService;
use consumet_core::ResolutionEngine;

#[derive(Clone, Copy)]
enum Upstream {
    Playable(&'static str),
    Down,
}

struct TestAdapter {
    upstream: Upstream,
}

#[async_trait]
impl ProviderAdapter for TestAdapter {
    async fn fetch_episode_sources(
        &self,
        _episode_id: &str,
        _server: Option<StreamingServer>,
        _variant: Variant,
    ) -> Result<Manifest, ProviderError> {
        match self.upstream {
            Upstream::Playable(url) => Ok(Manifest::from_sources([Source::new(url)])),
            Upstream::Down => Err(ProviderError::Network("connection refused".to_string())),
        }
    }

    async fn fetch_episodes_list(
        &self,
        id: &str,
        _variant: Variant,
    ) -> Result<EpisodeList, ProviderError> {
        match self.upstream {
            Upstream::Playable(_) => Ok(EpisodeList {
                episodes: vec![Episode {
                    id: format!("{id}-1"),
                    number: Some(1.0),
                    title: None,
                    image: None,
                    is_filler: None,
                    url: None,
                    air_date: None,
                }],
            }),
            Upstream::Down => Err(ProviderError::Http { status: 503 }),
        }
    }
}

fn factory(upstream: Upstream, calls: Arc<AtomicUsize>) -> AdapterFactory {
    Arc::new(move |_descriptor: &ProviderDescriptor| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(TestAdapter { upstream }) as Arc<dyn ProviderAdapter>)
    })
}

fn app(zoro: Upstream, gogoanime: Upstream) -> (axum::Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let caps = [Capability::FetchEpisodeSources, Capability::FetchEpisodesList];
    let registry = ProviderRegistry::builder()
        .register(
            ProviderDescriptor::new("zoro", ContentDomain::Anime, caps),
            factory(zoro, calls.clone()),
        )
        .register(
            ProviderDescriptor::new("gogoanime", ContentDomain::Anime, caps),
            factory(gogoanime, calls.clone()),
        )
        .default_order(ContentDomain::Anime, ["zoro", "gogoanime"])
        .build()
        .unwrap();

    let cache = ResultCache::new(Arc::new(MemoryBackend::new(100)));
    let content = Arc::new(ContentService::new(
        Arc::new(ResolutionEngine::new(Arc::new(registry))),
        cache.clone(),
        KeyBuilder::new("api-test"),
        TtlPolicy::default(),
    ));

    let state = AppState { content, cache };
    (create_router(state, &["*".to_string()]), calls)
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn watch_returns_provider_used_and_sources() {
    let (router, _) = app(Upstream::Playable("http://x/a.m3u8"), Upstream::Playable("http://x/b.mp4"));

    let (status, body) = get(router, "/anime/watch/12345?provider=zoro").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["providerUsed"], "zoro");
    assert_eq!(body["sources"][0]["url"], "http://x/a.m3u8");
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn watch_reports_errors_of_skipped_providers() {
    let (router, _) = app(Upstream::Down, Upstream::Playable("http://x/b.mp4"));

    let (status, body) = get(router, "/anime/watch/12345").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["providerUsed"], "gogoanime");
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    assert_eq!(body["errors"][0]["provider"], "zoro");
}

#[tokio::test]
async fn watch_exhaustion_is_404_with_every_provider() {
    let (router, _) = app(Upstream::Down, Upstream::Down);

    let (status, body) = get(router, "/anime/watch/12345").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No playable source found from available providers");
    assert_eq!(body["triedProviders"], serde_json::json!(["zoro", "gogoanime"]));
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn watch_with_unknown_server_is_400_without_provider_calls() {
    let (router, calls) = app(Upstream::Playable("http://x/a.m3u8"), Upstream::Down);

    let (status, body) = get(router, "/anime/watch/12345?server=not-a-real-server").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Invalid server"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn episodes_route_parses_flags() {
    let (router, _) = app(Upstream::Playable("http://x/a.m3u8"), Upstream::Down);

    let (status, body) = get(router, "/anime/episodes/21?dub=1&fetchFiller=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["providerUsed"], "zoro");
    assert_eq!(body["episodes"][0]["id"], "21-1");
}

#[tokio::test]
async fn unknown_domain_is_404() {
    let (router, _) = app(Upstream::Down, Upstream::Down);
    let (status, _) = get(router, "/podcasts/watch/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn providers_listing_validates_type() {
    let (router, _) = app(Upstream::Down, Upstream::Down);

    let (status, body) = get(router.clone(), "/providers?type=ANIME").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "ANIME");
    let names: Vec<_> = body["providers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["zoro", "gogoanime"]);

    let (status, body) = get(router.clone(), "/providers?type=PODCASTS").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("LIGHT_NOVELS"));

    let (status, _) = get(router, "/providers").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_cache_backend() {
    let (router, _) = app(Upstream::Down, Upstream::Down);

    let (status, body) = get(router.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"status": "ok"}));

    let (status, body) = get(router, "/health/cache").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], "memory");
}
