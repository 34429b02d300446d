//! Content service
//!
//! Composes the resolution engine with the result cache. Only resolved values
//! are cached; exhaustion and errors always go back to the caller uncached so
//! the next request retries the providers. Concurrent requests for the same
//! key share one resolution, whatever its outcome.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

use crate::cache::{KeyBuilder, ResultCache, SingleFlight, TtlPolicy};
use crate::provider::{ContentDomain, EpisodeList, Manifest, MediaInfo, ProviderDescriptor, SearchPage};
use crate::resolution::{
    ProviderFailure, Resolution, ResolutionEngine, ResolutionRequest, Resolved, SearchRequest,
};
use crate::{Error, Result};

/// Outcome that must not reach the cache
#[derive(Debug, Clone)]
enum Uncached {
    Exhausted {
        tried_providers: Vec<String>,
        errors: Vec<ProviderFailure>,
    },
    Error(Arc<Error>),
}

impl Uncached {
    fn abandoned() -> Self {
        Self::Error(Arc::new(Error::Internal(
            "concurrent resolution was abandoned".to_string(),
        )))
    }
}

type Flight<T> = SingleFlight<Resolved<T>, Uncached>;

/// One flight group per result type
#[derive(Clone, Default)]
struct Flights {
    watch: Flight<Manifest>,
    episodes: Flight<EpisodeList>,
    info: Flight<MediaInfo>,
    search: Flight<SearchPage>,
}

/// Content resolution service
#[derive(Clone)]
pub struct ContentService {
    engine: Arc<ResolutionEngine>,
    cache: ResultCache,
    keys: KeyBuilder,
    ttl: TtlPolicy,
    flights: Option<Flights>,
}

impl std::fmt::Debug for ContentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentService")
            .field("cache", &self.cache)
            .field("prefix", &self.keys.prefix())
            .field("single_flight", &self.flights.is_some())
            .finish_non_exhaustive()
    }
}

impl ContentService {
    #[must_use]
    pub fn new(
        engine: Arc<ResolutionEngine>,
        cache: ResultCache,
        keys: KeyBuilder,
        ttl: TtlPolicy,
    ) -> Self {
        Self {
            engine,
            cache,
            keys,
            ttl,
            flights: None,
        }
    }

    /// Let concurrent requests for one key share a single resolution
    #[must_use]
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.flights = enabled.then(Flights::default);
        self
    }

    #[must_use]
    pub fn engine(&self) -> &ResolutionEngine {
        &self.engine
    }

    /// Playable sources for an episode, falling back across providers
    pub async fn watch(
        &self,
        domain: ContentDomain,
        request: &ResolutionRequest,
    ) -> Result<Resolution<Manifest>> {
        // Reject bad input before touching the cache
        request.validate()?;
        request.validated_server()?;

        let request = self.normalized(domain, request);
        let key = self.keys.watch(domain, &request);
        self.cached(
            self.flights.as_ref().map(|f| &f.watch),
            key,
            self.ttl.watch_ttl(),
            self.engine.resolve_sources(domain, &request),
        )
        .await
    }

    /// Episode list of a title
    pub async fn episodes(
        &self,
        domain: ContentDomain,
        request: &ResolutionRequest,
    ) -> Result<Resolution<EpisodeList>> {
        request.validate()?;

        let request = self.normalized(domain, request);
        let key = self.keys.episodes(domain, &request);
        self.cached(
            self.flights.as_ref().map(|f| &f.episodes),
            key,
            self.ttl.episodes_ttl_now(),
            self.engine.resolve_episodes(domain, &request),
        )
        .await
    }

    /// Title information including its episodes
    pub async fn info(
        &self,
        domain: ContentDomain,
        request: &ResolutionRequest,
    ) -> Result<Resolution<MediaInfo>> {
        request.validate()?;

        let request = self.normalized(domain, request);
        let key = self.keys.info(domain, &request);
        self.cached(
            self.flights.as_ref().map(|f| &f.info),
            key,
            self.ttl.episodes_ttl_now(),
            self.engine.resolve_info(domain, &request),
        )
        .await
    }

    pub async fn search(
        &self,
        domain: ContentDomain,
        request: &SearchRequest,
    ) -> Result<Resolution<SearchPage>> {
        request.validate()?;

        let request = SearchRequest {
            provider_hint: self
                .engine
                .recognized_hint(domain, request.provider_hint.as_deref()),
            ..request.clone()
        };
        let key = self.keys.search(domain, &request);
        self.cached(
            self.flights.as_ref().map(|f| &f.search),
            key,
            self.ttl.listing_ttl(),
            self.engine.search(domain, &request),
        )
        .await
    }

    /// Enabled providers of a domain, in fallback order
    #[must_use]
    pub fn providers(&self, domain: ContentDomain) -> Vec<ProviderDescriptor> {
        let registry = self.engine.registry();
        registry
            .default_order(domain)
            .iter()
            .filter_map(|name| registry.lookup(domain, name).cloned())
            .collect()
    }

    /// Drop a provider hint the engine would ignore, so it cannot split the cache
    fn normalized(&self, domain: ContentDomain, request: &ResolutionRequest) -> ResolutionRequest {
        ResolutionRequest {
            provider_hint: self
                .engine
                .recognized_hint(domain, request.provider_hint.as_deref()),
            ..request.clone()
        }
    }

    async fn cached<T, Fut>(
        &self,
        flight: Option<&Flight<T>>,
        key: String,
        ttl: u64,
        resolve: Fut,
    ) -> Result<Resolution<T>>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<Resolution<T>>> + Send,
    {
        let load = self
            .cache
            .try_fetch::<Resolved<T>, Uncached, _, _>(&key, ttl, || async move {
                match resolve.await {
                    Ok(Resolution::Resolved(resolved)) => Ok(resolved),
                    Ok(Resolution::Exhausted {
                        tried_providers,
                        errors,
                    }) => Err(Uncached::Exhausted {
                        tried_providers,
                        errors,
                    }),
                    Err(e) => Err(Uncached::Error(Arc::new(e))),
                }
            });

        let outcome = match flight {
            Some(flight) => {
                flight
                    .do_work_with_fallback(key.clone(), load, Uncached::abandoned)
                    .await
            }
            None => load.await,
        };

        match outcome {
            Ok(resolved) => Ok(Resolution::Resolved(resolved)),
            Err(Uncached::Exhausted {
                tried_providers,
                errors,
            }) => Ok(Resolution::Exhausted {
                tried_providers,
                errors,
            }),
            Err(Uncached::Error(e)) => Err(e.into()),
        }
    }
}
