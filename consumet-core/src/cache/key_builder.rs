//! Cache key builder
//!
//! All keys share a configurable prefix so several deployments can use one
//! Redis. Components follow the `op;id;dub;fetchFiller;provider` layout.
//!
//! - `{prefix}:{domain}:watch;{episodeId};{server};{dub};{provider}`
//! - `{prefix}:{domain}:episodes;{id};{dub};{fetchFiller};{provider}`
//! - `{prefix}:{domain}:info;{id};{dub};{fetchFiller};{provider}`
//! - `{prefix}:{domain}:search;{query};{page};{provider}`

use crate::provider::ContentDomain;
use crate::resolution::{ResolutionRequest, SearchRequest};
use crate::Config;

#[derive(Debug, Clone)]
pub struct KeyBuilder {
    prefix: String,
}

impl KeyBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.redis.key_prefix.clone())
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn watch(&self, domain: ContentDomain, request: &ResolutionRequest) -> String {
        format!(
            "{}:{}:watch;{};{};{};{}",
            self.prefix,
            domain.path_segment(),
            request.content_id,
            request
                .server_hint
                .as_deref()
                .map_or_else(|| "default".to_string(), str::to_ascii_lowercase),
            request.variant.dub,
            request.provider_key(),
        )
    }

    #[must_use]
    pub fn episodes(&self, domain: ContentDomain, request: &ResolutionRequest) -> String {
        self.listing("episodes", domain, request)
    }

    #[must_use]
    pub fn info(&self, domain: ContentDomain, request: &ResolutionRequest) -> String {
        self.listing("info", domain, request)
    }

    #[must_use]
    pub fn search(&self, domain: ContentDomain, request: &SearchRequest) -> String {
        format!(
            "{}:{}:search;{};{};{}",
            self.prefix,
            domain.path_segment(),
            request.query.trim().to_lowercase(),
            request.page,
            request.provider_key(),
        )
    }

    fn listing(&self, op: &str, domain: ContentDomain, request: &ResolutionRequest) -> String {
        format!(
            "{}:{}:{};{};{};{};{}",
            self.prefix,
            domain.path_segment(),
            op,
            request.content_id,
            request.variant.dub,
            request.variant.fetch_filler,
            request.provider_key(),
        )
    }
}

impl Default for KeyBuilder {
    fn default() -> Self {
        Self::new("consumet")
    }
}
