// Upstream Adapter
//
// ProviderAdapter over a consumet-compatible JSON upstream. The HTTP work is
// delegated to consumet_providers::UpstreamClient; this layer only maps wire
// types onto the content models.

use async_trait::async_trait;
use consumet_providers::upstream::types::{EpisodeItem, SearchResponse, SourcesResponse};
use consumet_providers::UpstreamClient;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{
    AdapterFactory, Episode, EpisodeList, Manifest, MediaInfo, ProviderAdapter, ProviderDescriptor,
    ProviderError, SearchPage, SearchResult, Segment, Source, StreamingServer, Subtitle, Variant,
};
use crate::config::ProvidersConfig;

/// Shared settings the upstream factory draws from
#[derive(Debug)]
pub struct UpstreamSettings {
    upstreams: BTreeMap<String, String>,
    proxies: Vec<String>,
    request_timeout: Duration,
    next_proxy: AtomicUsize,
}

impl UpstreamSettings {
    #[must_use]
    pub fn new(config: &ProvidersConfig, request_timeout: Duration) -> Self {
        Self {
            upstreams: config
                .upstreams
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
                .collect(),
            proxies: config.proxy.clone(),
            request_timeout,
            next_proxy: AtomicUsize::new(0),
        }
    }

    /// Base URL for a provider: descriptor override first, then config
    #[must_use]
    pub fn base_url_for(&self, descriptor: &ProviderDescriptor) -> Option<String> {
        descriptor
            .base_url_override
            .clone()
            .or_else(|| self.upstreams.get(&descriptor.name).cloned())
    }

    /// Round-robin over the configured proxies
    fn next_proxy(&self) -> Option<String> {
        if self.proxies.is_empty() {
            return None;
        }
        let idx = self.next_proxy.fetch_add(1, Ordering::Relaxed) % self.proxies.len();
        self.proxies.get(idx).cloned()
    }
}

/// Adapter backed by one upstream HTTP client
///
/// Each instance owns its own client and therefore its own cookie jar.
#[derive(Debug)]
pub struct UpstreamAdapter {
    provider: String,
    client: UpstreamClient,
}

impl UpstreamAdapter {
    pub fn new(provider: impl Into<String>, client: UpstreamClient) -> Self {
        Self {
            provider: provider.into(),
            client,
        }
    }

    /// Factory building a new adapter (and HTTP client) per attempt
    pub fn factory(settings: Arc<UpstreamSettings>) -> AdapterFactory {
        Arc::new(move |descriptor: &ProviderDescriptor| {
            let base_url = settings.base_url_for(descriptor).ok_or_else(|| {
                ProviderError::InvalidConfig(format!(
                    "no upstream configured for {}",
                    descriptor.name
                ))
            })?;
            let client = UpstreamClient::builder(base_url)
                .proxy(settings.next_proxy())
                .request_timeout(settings.request_timeout)
                .build()?;
            Ok(Arc::new(Self::new(descriptor.name.clone(), client)) as Arc<dyn ProviderAdapter>)
        })
    }
}

fn map_episode(item: EpisodeItem) -> Episode {
    Episode {
        id: item.id,
        number: item.number,
        title: item.title,
        image: item.image,
        is_filler: item.is_filler,
        url: item.url,
        air_date: item.air_date,
    }
}

fn map_manifest(resp: SourcesResponse) -> Manifest {
    Manifest {
        headers: resp.headers.into_iter().collect(),
        sources: resp
            .sources
            .into_iter()
            .map(|s| Source {
                url: s.url,
                quality: s.quality,
                is_m3u8: s.is_m3u8,
            })
            .collect(),
        subtitles: resp
            .subtitles
            .into_iter()
            .map(|s| Subtitle { url: s.url, lang: s.lang })
            .collect(),
        intro: resp.intro.map(|r| Segment { start: r.start, end: r.end }),
        outro: resp.outro.map(|r| Segment { start: r.start, end: r.end }),
        download: resp.download,
    }
}

fn map_search(resp: SearchResponse, page: u32) -> SearchPage {
    SearchPage {
        current_page: resp.current_page.unwrap_or(page),
        has_next_page: resp.has_next_page.unwrap_or(false),
        results: resp
            .results
            .into_iter()
            .map(|r| SearchResult {
                title: r.title.map(|t| t.display()).unwrap_or_else(|| r.id.clone()),
                id: r.id,
                url: r.url,
                image: r.image,
            })
            .collect(),
    }
}

#[async_trait]
impl ProviderAdapter for UpstreamAdapter {
    async fn fetch_episode_sources(
        &self,
        episode_id: &str,
        server: Option<StreamingServer>,
        variant: Variant,
    ) -> Result<Manifest, ProviderError> {
        tracing::debug!(provider = %self.provider, episode_id, ?server, "Fetching episode sources");
        let resp = self
            .client
            .watch(episode_id, server.map(StreamingServer::as_str), variant.dub)
            .await?;
        Ok(map_manifest(resp))
    }

    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, ProviderError> {
        tracing::debug!(provider = %self.provider, query, page, "Searching");
        let resp = self.client.search(query, page).await?;
        Ok(map_search(resp, page))
    }

    async fn fetch_info(&self, id: &str, variant: Variant) -> Result<MediaInfo, ProviderError> {
        tracing::debug!(provider = %self.provider, id, "Fetching info");
        let resp = self.client.info(id, variant.dub, variant.fetch_filler).await?;
        Ok(MediaInfo {
            title: resp.title.map(|t| t.display()).unwrap_or_else(|| resp.id.clone()),
            id: resp.id,
            image: resp.image,
            description: resp.description,
            status: resp.status,
            total_episodes: resp.total_episodes,
            episodes: resp.episodes.into_iter().map(map_episode).collect(),
        })
    }

    async fn fetch_episodes_list(
        &self,
        id: &str,
        variant: Variant,
    ) -> Result<EpisodeList, ProviderError> {
        tracing::debug!(provider = %self.provider, id, "Fetching episode list");
        let items = self
            .client
            .episodes(id, variant.dub, variant.fetch_filler)
            .await?;
        Ok(EpisodeList {
            episodes: items.into_iter().map(map_episode).collect(),
        })
    }
}
