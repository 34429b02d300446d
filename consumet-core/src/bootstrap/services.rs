//! Service initialization and dependency injection

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::{
    cache::{CacheBackend, KeyBuilder, MemoryBackend, RedisBackend, ResultCache, TtlPolicy},
    provider::{
        catalog, ProviderDescriptor, ProviderRegistry, UpstreamAdapter, UpstreamSettings,
    },
    resilience::timeout::{with_timeout, TimeoutConfig},
    service::ContentService,
    Config,
};

/// Container for all initialized services
#[derive(Clone)]
pub struct Services {
    /// Provider catalog with per-attempt adapter factories
    pub registry: Arc<ProviderRegistry>,
    /// Result cache in front of the resolution engine
    pub cache: ResultCache,
    /// Watch/episodes/info/search with fallback and caching
    pub content: Arc<ContentService>,
}

/// Initialize all core services
pub async fn init_services(config: &Config) -> anyhow::Result<Services> {
    info!("Initializing services...");
    let timeouts = TimeoutConfig::from_config(config);

    let registry = Arc::new(build_registry(config, timeouts.adapter_attempt)?);
    info!("Provider registry initialized");

    let cache = init_cache(config, &timeouts).await;
    info!(backend = cache.backend_name(), "Result cache initialized");

    let engine = Arc::new(
        crate::ResolutionEngine::new(registry.clone())
            .with_attempt_timeout(timeouts.adapter_attempt),
    );
    let content = Arc::new(ContentService::new(
        engine,
        cache.clone(),
        KeyBuilder::from_config(config),
        TtlPolicy::from_config(&config.cache),
    )
    .with_single_flight(config.cache.single_flight));
    info!(single_flight = config.cache.single_flight, "ContentService initialized");

    Ok(Services {
        registry,
        cache,
        content,
    })
}

/// Register every enabled catalog entry behind the upstream adapter factory
pub fn build_registry(config: &Config, attempt_timeout: Duration) -> anyhow::Result<ProviderRegistry> {
    let settings = Arc::new(UpstreamSettings::new(&config.providers, attempt_timeout));
    let factory = UpstreamAdapter::factory(settings.clone());

    let mut builder = ProviderRegistry::builder();
    for entry in catalog::enabled() {
        let override_url = entry.base_url_env.and_then(|var| std::env::var(var).ok());
        let descriptor = ProviderDescriptor::new(
            entry.name,
            entry.domain,
            entry.capabilities.iter().copied(),
        )
        .with_base_url_override(override_url);

        if settings.base_url_for(&descriptor).is_none() {
            warn!(
                provider = entry.name,
                domain = %entry.domain,
                "No upstream configured; attempts against this provider will fail"
            );
        }
        builder = builder.register(descriptor, factory.clone());
    }

    for domain in crate::provider::ContentDomain::ALL {
        builder = builder.default_order(domain, catalog::default_order(domain));
    }

    Ok(builder.build()?)
}

/// Pick the cache backend: Redis if configured and reachable, else in-process, else none
async fn init_cache(config: &Config, timeouts: &TimeoutConfig) -> ResultCache {
    if !config.cache.enabled {
        warn!("Result cache DISABLED by configuration");
        return ResultCache::disabled();
    }

    let backend: Option<Arc<dyn CacheBackend>> = if config.redis_enabled() {
        match with_timeout(
            timeouts.redis_connect,
            "redis connect",
            RedisBackend::connect(&config.redis.url),
        )
        .await
        {
            Ok(redis) => Some(Arc::new(redis)),
            Err(e) => {
                warn!(error = %e, "Redis unavailable, falling back");
                memory_backend(config)
            }
        }
    } else {
        info!("Redis not configured");
        memory_backend(config)
    };

    match backend {
        Some(backend) => ResultCache::new(backend).with_operation_timeout(timeouts.cache_operation),
        None => {
            warn!("No cache backend available, caching disabled");
            ResultCache::disabled()
        }
    }
}

fn memory_backend(config: &Config) -> Option<Arc<dyn CacheBackend>> {
    config
        .cache
        .memory_fallback
        .then(|| Arc::new(MemoryBackend::new(config.cache.memory_capacity)) as Arc<dyn CacheBackend>)
}
