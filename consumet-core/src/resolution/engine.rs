//! Provider fallback engine
//!
//! Walks the attempt order one provider at a time. Each attempt gets a fresh
//! adapter from the registry and a bounded time budget; the first usable
//! value wins and everything before it is recorded.

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::attempt::{ErrorAggregator, FailureKind, ResolutionAttempt};
use super::order::{attempt_order, recognized_hint};
use super::playability::Usable;
use super::request::{ResolutionRequest, SearchRequest};
use super::result::{Resolution, Resolved};
use crate::provider::{
    Capability, ContentDomain, EpisodeList, Manifest, MediaInfo, ProviderAdapter, ProviderError,
    ProviderRegistry, SearchPage,
};
use crate::resilience::timeout::ADAPTER_ATTEMPT_TIMEOUT;
use crate::{Error, Result};

type AdapterCall<T> =
    dyn Fn(Arc<dyn ProviderAdapter>) -> BoxFuture<'static, std::result::Result<T, ProviderError>> + Send + Sync;

#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    registry: Arc<ProviderRegistry>,
    attempt_timeout: Duration,
}

impl ResolutionEngine {
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            attempt_timeout: ADAPTER_ATTEMPT_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    #[must_use]
    pub const fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Resolve playable sources for an episode (the watch flow)
    ///
    /// An unknown server hint fails before any adapter is built.
    pub async fn resolve_sources(
        &self,
        domain: ContentDomain,
        request: &ResolutionRequest,
    ) -> Result<Resolution<Manifest>> {
        request.validate()?;
        let server = request.validated_server()?;
        let id = request.content_id.clone();
        let variant = request.variant;

        self.run(
            domain,
            Capability::FetchEpisodeSources,
            request.provider_hint.as_deref(),
            &move |adapter: Arc<dyn ProviderAdapter>| {
                let id = id.clone();
                async move { adapter.fetch_episode_sources(&id, server, variant).await }.boxed()
            },
        )
        .await
    }

    /// Resolve a non-empty episode list
    pub async fn resolve_episodes(
        &self,
        domain: ContentDomain,
        request: &ResolutionRequest,
    ) -> Result<Resolution<EpisodeList>> {
        request.validate()?;
        let id = request.content_id.clone();
        let variant = request.variant;

        self.run(
            domain,
            Capability::FetchEpisodesList,
            request.provider_hint.as_deref(),
            &move |adapter: Arc<dyn ProviderAdapter>| {
                let id = id.clone();
                async move { adapter.fetch_episodes_list(&id, variant).await }.boxed()
            },
        )
        .await
    }

    /// Resolve title information
    pub async fn resolve_info(
        &self,
        domain: ContentDomain,
        request: &ResolutionRequest,
    ) -> Result<Resolution<MediaInfo>> {
        request.validate()?;
        let id = request.content_id.clone();
        let variant = request.variant;

        self.run(
            domain,
            Capability::FetchInfo,
            request.provider_hint.as_deref(),
            &move |adapter: Arc<dyn ProviderAdapter>| {
                let id = id.clone();
                async move { adapter.fetch_info(&id, variant).await }.boxed()
            },
        )
        .await
    }

    /// Search the first provider that answers
    pub async fn search(
        &self,
        domain: ContentDomain,
        request: &SearchRequest,
    ) -> Result<Resolution<SearchPage>> {
        request.validate()?;
        let query = request.query.clone();
        let page = request.page;

        self.run(
            domain,
            Capability::Search,
            request.provider_hint.as_deref(),
            &move |adapter: Arc<dyn ProviderAdapter>| {
                let query = query.clone();
                async move { adapter.search(&query, page).await }.boxed()
            },
        )
        .await
    }

    /// The provider hint as the engine will honour it; `None` when it names
    /// no provider in the domain's default order
    #[must_use]
    pub fn recognized_hint(&self, domain: ContentDomain, hint: Option<&str>) -> Option<String> {
        recognized_hint(self.registry.default_order(domain), hint)
    }

    /// Candidates for an operation: attempt order minus providers lacking the capability
    #[must_use]
    pub fn candidates(
        &self,
        domain: ContentDomain,
        capability: Capability,
        hint: Option<&str>,
    ) -> Vec<String> {
        attempt_order(self.registry.default_order(domain), hint)
            .into_iter()
            .filter(|name| {
                self.registry
                    .lookup(domain, name)
                    .is_some_and(|d| d.supports(capability))
            })
            .collect()
    }

    async fn run<T: Usable + Send + 'static>(
        &self,
        domain: ContentDomain,
        capability: Capability,
        hint: Option<&str>,
        call: &AdapterCall<T>,
    ) -> Result<Resolution<T>> {
        let candidates = self.candidates(domain, capability, hint);
        if candidates.is_empty() {
            return Err(Error::NotFound(format!(
                "No providers available for {domain} {capability:?}"
            )));
        }

        debug!(domain = %domain, order = ?candidates, "Resolving");

        let mut attempts = Vec::with_capacity(candidates.len());
        let mut errors = ErrorAggregator::new();

        for name in candidates {
            match self.attempt(domain, &name, call).await {
                Ok(value) => {
                    info!(
                        domain = %domain,
                        provider = %name,
                        failed_before = errors.len(),
                        "Resolved"
                    );
                    attempts.push(ResolutionAttempt::success(name.clone()));
                    return Ok(Resolution::Resolved(Resolved {
                        provider_used: name,
                        value,
                        attempts,
                        errors: errors.into_errors(),
                    }));
                }
                Err((kind, message)) => {
                    warn!(
                        domain = %domain,
                        provider = %name,
                        kind = ?kind,
                        error = %message,
                        "Provider attempt failed"
                    );
                    let attempt = ResolutionAttempt::failure(name, kind, message);
                    errors.record_attempt(&attempt);
                    attempts.push(attempt);
                }
            }
        }

        let tried_providers: Vec<String> =
            attempts.into_iter().map(|a| a.provider_name).collect();
        warn!(
            domain = %domain,
            tried = ?tried_providers,
            "No provider produced a usable result"
        );
        Ok(Resolution::Exhausted {
            tried_providers,
            errors: errors.into_errors(),
        })
    }

    async fn attempt<T: Usable + Send + 'static>(
        &self,
        domain: ContentDomain,
        name: &str,
        call: &AdapterCall<T>,
    ) -> std::result::Result<T, (FailureKind, String)> {
        let adapter = self
            .registry
            .create_adapter(domain, name)
            .map_err(|e| (FailureKind::ProviderError, e.to_string()))?;

        let value = match tokio::time::timeout(self.attempt_timeout, call(adapter)).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => return Err((FailureKind::ProviderError, e.to_string())),
            Err(_) => {
                let e = ProviderError::Timeout(format!(
                    "no answer within {}s",
                    self.attempt_timeout.as_secs_f64()
                ));
                return Err((FailureKind::ProviderError, e.to_string()));
            }
        };

        value.check_usable()?;
        Ok(value)
    }
}
