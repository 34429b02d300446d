//! Cache backends
//!
//! The result cache only needs `GET key` and `SET key value EX ttl`. Values are
//! JSON strings; encoding lives one layer up.

use async_trait::async_trait;
use moka::Expiry;
use std::time::{Duration, Instant};

use crate::Result;

#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Live value for `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key` for `ttl`
    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    ttl: Duration,
}

/// Each entry expires after the TTL it was written with
struct PerEntryTtl;

impl Expiry<String, MemoryEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &MemoryEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &MemoryEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process backend (Moka), used when Redis is not configured or unreachable
#[derive(Clone)]
pub struct MemoryBackend {
    cache: moka::future::Cache<String, MemoryEntry>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        let cache = moka::future::Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }

    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.get(key).await.map(|e| e.value))
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        self.cache
            .insert(key.to_string(), MemoryEntry { value, ttl })
            .await;
        Ok(())
    }
}
