//! Result cache
//!
//! TTL cache in front of expensive provider work. The cache is strictly an
//! accelerator: with no backend every call runs the producer, and backend
//! failures are logged and treated as misses.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::backend::CacheBackend;
use crate::resilience::timeout::{with_timeout, CACHE_OPERATION_TIMEOUT};

#[derive(Clone)]
pub struct ResultCache {
    backend: Option<Arc<dyn CacheBackend>>,
    op_timeout: Duration,
}

impl ResultCache {
    /// Pass-through cache; every call runs the producer
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            backend: None,
            op_timeout: CACHE_OPERATION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend: Some(backend),
            op_timeout: CACHE_OPERATION_TIMEOUT,
        }
    }

    /// Upper bound for each backend get/set
    #[must_use]
    pub const fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = timeout;
        self
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.as_ref().map_or("disabled", |b| b.name())
    }

    /// Return the live value for `key`, or run `producer` and store its result
    ///
    /// A `ttl_seconds` of zero runs the producer without storing.
    pub async fn fetch<T, F, Fut>(&self, key: &str, ttl_seconds: u64, producer: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let result = self
            .try_fetch(key, ttl_seconds, || async move {
                Ok::<T, Infallible>(producer().await)
            })
            .await;
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`fetch`](Self::fetch) for fallible producers; errors are never stored
    pub async fn try_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        ttl_seconds: u64,
        producer: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(backend) = self.backend.as_deref() else {
            return producer().await;
        };

        if let Some(hit) = self.lookup(backend, key).await {
            return Ok(hit);
        }

        let value = producer().await?;
        if ttl_seconds > 0 {
            self.store(backend, key, &value, ttl_seconds).await;
        }
        Ok(value)
    }

    async fn lookup<T: DeserializeOwned>(&self, backend: &dyn CacheBackend, key: &str) -> Option<T> {
        match with_timeout(self.op_timeout, "cache get", backend.get(key)).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    tracing::debug!(key, backend = backend.name(), "Cache hit");
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "Discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(key, "Cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(key, backend = backend.name(), error = %e, "Cache read failed");
                None
            }
        }
    }

    async fn store<T: Serialize>(
        &self,
        backend: &dyn CacheBackend,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to encode value for caching");
                return;
            }
        };
        let ttl = Duration::from_secs(ttl_seconds);
        match with_timeout(self.op_timeout, "cache set", backend.set_ex(key, raw, ttl)).await {
            Ok(()) => tracing::debug!(key, ttl_seconds, "Cached"),
            Err(e) => {
                tracing::warn!(key, backend = backend.name(), error = %e, "Cache write failed");
            }
        }
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("backend", &self.backend_name())
            .field("op_timeout", &self.op_timeout)
            .finish()
    }
}
