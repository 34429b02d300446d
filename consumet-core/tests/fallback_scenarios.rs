//! End-to-end fallback scenarios for consumet-core
//!
//! Registry, engine, cache and service wired together the way bootstrap does
//! it, with in-memory adapters standing in for upstreams.
//!
//! Run with: cargo test --test fallback_scenarios

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use consumet_core::cache::{KeyBuilder, MemoryBackend, ResultCache, TtlPolicy};
use consumet_core::provider::{
    AdapterFactory, Capability, ContentDomain, Manifest, ProviderAdapter, ProviderDescriptor,
    ProviderError, ProviderRegistry, Source, StreamingServer, Variant,
};
use consumet_core::resolution::{Resolution, ResolutionRequest};
use consumet_core::service::ContentService;
use consumet_core::{Error, ResolutionEngine};

#[derive(Clone)]
enum Behaviour {
    Serve(&'static str),
    Fail(&'static str),
}

#[derive(Clone, Default)]
struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    fn record(&self, name: &str) {
        self.0.lock().unwrap().push(name.to_string());
    }

    fn names(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct FixedAdapter {
    name: String,
    behaviour: Behaviour,
    calls: Calls,
}

#[async_trait]
impl ProviderAdapter for FixedAdapter {
    async fn fetch_episode_sources(
        &self,
        _episode_id: &str,
        _server: Option<StreamingServer>,
        _variant: Variant,
    ) -> Result<Manifest, ProviderError> {
        self.calls.record(&self.name);
        match self.behaviour {
            Behaviour::Serve(url) => Ok(Manifest::from_sources([Source::new(url)])),
            Behaviour::Fail(msg) => Err(ProviderError::Network(msg.to_string())),
        }
    }
}

struct Harness {
    service: ContentService,
    calls: Calls,
    built: Arc<AtomicUsize>,
}

fn harness(zoro: Behaviour, gogoanime: Behaviour) -> Harness {
    let calls = Calls::default();
    let built = Arc::new(AtomicUsize::new(0));

    let factory = |behaviour: Behaviour| -> AdapterFactory {
        let calls = calls.clone();
        let built = built.clone();
        Arc::new(move |descriptor: &ProviderDescriptor| {
            built.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FixedAdapter {
                name: descriptor.name.clone(),
                behaviour: behaviour.clone(),
                calls: calls.clone(),
            }) as Arc<dyn ProviderAdapter>)
        })
    };

    let sources = [Capability::FetchEpisodeSources];
    let registry = ProviderRegistry::builder()
        .register(ProviderDescriptor::new("zoro", ContentDomain::Anime, sources), factory(zoro))
        .register(
            ProviderDescriptor::new("gogoanime", ContentDomain::Anime, sources),
            factory(gogoanime),
        )
        .default_order(ContentDomain::Anime, ["zoro", "gogoanime"])
        .build()
        .unwrap();

    let engine = Arc::new(ResolutionEngine::new(Arc::new(registry)));
    let cache = ResultCache::new(Arc::new(MemoryBackend::new(1_000)));
    let service = ContentService::new(engine, cache, KeyBuilder::new("it"), TtlPolicy::default())
        .with_single_flight(true);

    Harness {
        service,
        calls,
        built,
    }
}

#[tokio::test]
async fn scenario_hinted_provider_serves_playable_source() {
    let h = harness(Behaviour::Serve("http://x/a.m3u8"), Behaviour::Serve("http://x/b.mp4"));
    let req = ResolutionRequest::new("12345").with_provider(Some("zoro"));

    let res = h.service.watch(ContentDomain::Anime, &req).await.unwrap();
    let Resolution::Resolved(resolved) = res else {
        panic!("expected a resolved result");
    };

    assert_eq!(resolved.provider_used, "zoro");
    assert_eq!(resolved.value.sources.len(), 1);
    assert_eq!(resolved.value.sources[0].url, "http://x/a.m3u8");
    assert!(resolved.errors.is_empty());
}

#[tokio::test]
async fn scenario_falls_back_to_second_provider() {
    let h = harness(Behaviour::Fail("connection reset"), Behaviour::Serve("http://x/b.mp4"));

    let res = h
        .service
        .watch(ContentDomain::Anime, &ResolutionRequest::new("12345"))
        .await
        .unwrap();
    let Resolution::Resolved(resolved) = res else {
        panic!("expected a resolved result");
    };

    assert_eq!(resolved.provider_used, "gogoanime");
    assert_eq!(resolved.errors.len(), 1);
    assert_eq!(resolved.errors[0].provider, "zoro");
    assert_eq!(h.calls.names(), ["zoro", "gogoanime"]);
}

#[tokio::test]
async fn scenario_all_providers_fail() {
    let h = harness(Behaviour::Fail("HTTP 500"), Behaviour::Fail("HTTP 502"));

    let res = h
        .service
        .watch(ContentDomain::Anime, &ResolutionRequest::new("12345"))
        .await
        .unwrap();

    match res {
        Resolution::Exhausted {
            tried_providers,
            errors,
        } => {
            assert_eq!(tried_providers, ["zoro", "gogoanime"]);
            assert_eq!(errors.len(), 2);
            assert_eq!(errors[0].provider, "zoro");
            assert_eq!(errors[1].provider, "gogoanime");
        }
        Resolution::Resolved(_) => panic!("expected exhaustion"),
    }
}

#[tokio::test]
async fn scenario_invalid_server_rejected_before_any_adapter() {
    let h = harness(Behaviour::Serve("http://x/a.m3u8"), Behaviour::Serve("http://x/b.mp4"));
    let req = ResolutionRequest::new("12345").with_server(Some("not-a-real-server"));

    let err = h.service.watch(ContentDomain::Anime, &req).await.unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(h.calls.names().is_empty());
    assert_eq!(h.built.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_resolution_is_retried_not_replayed() {
    let h = harness(Behaviour::Fail("down"), Behaviour::Fail("down"));
    let req = ResolutionRequest::new("777");

    for _ in 0..2 {
        let res = h.service.watch(ContentDomain::Anime, &req).await.unwrap();
        assert!(!res.is_resolved());
    }

    assert_eq!(h.calls.names(), ["zoro", "gogoanime", "zoro", "gogoanime"]);
}

#[tokio::test]
async fn each_attempt_gets_a_fresh_adapter() {
    let h = harness(Behaviour::Serve("http://x/a.m3u8"), Behaviour::Serve("http://x/b.mp4"));

    for id in ["1", "2", "3"] {
        h.service
            .watch(ContentDomain::Anime, &ResolutionRequest::new(id))
            .await
            .unwrap();
    }

    assert_eq!(h.built.load(Ordering::SeqCst), 3);
}
