// Provider Adapter Traits
//
// The fixed contract every adapter satisfies, plus the content models the
// contract speaks in.

use super::{ProviderError, StreamingServer};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sub/dub and filler preferences carried with a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub dub: bool,
    pub fetch_filler: bool,
}

/// One candidate media source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Adapter's own claim that the source is streamable
    #[serde(default, rename = "isM3U8", skip_serializing_if = "Option::is_none")]
    pub is_m3u8: Option<bool>,
}

impl Source {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            quality: None,
            is_m3u8: None,
        }
    }

    /// Playable by flag or by URL shape
    #[must_use]
    pub fn is_playable(&self) -> bool {
        crate::resolution::playability::is_playable(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Opening/ending markers in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: u64,
    pub end: u64,
}

/// Result of fetching an episode's sources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Headers a player must send (Referer etc.)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtitles: Vec<Subtitle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<Segment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outro: Option<Segment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<String>,
}

impl Manifest {
    pub fn from_sources(sources: impl IntoIterator<Item = Source>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Sources that pass the playability predicate, in manifest order
    pub fn playable_sources(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter().filter(|s| s.is_playable())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_filler: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeList {
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<u32>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub current_page: u32,
    pub has_next_page: bool,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// Provider adapter trait
///
/// Core interface every upstream adapter implements. Only
/// `fetch_episode_sources()` is mandatory; the other operations default to
/// `ProviderError::Unsupported`, and the registry descriptor states which ones
/// an adapter really offers.
///
/// An adapter instance may accumulate session state (cookies, rate-limit
/// counters). The engine builds a new instance per attempt and drops it
/// afterwards, so implementations never need to reset themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Fetch streaming sources for one episode
    async fn fetch_episode_sources(
        &self,
        episode_id: &str,
        server: Option<StreamingServer>,
        variant: Variant,
    ) -> Result<Manifest, ProviderError>;

    /// Search titles by free text
    async fn search(&self, _query: &str, _page: u32) -> Result<SearchPage, ProviderError> {
        Err(ProviderError::Unsupported("search"))
    }

    /// Fetch title information including its episodes
    async fn fetch_info(&self, _id: &str, _variant: Variant) -> Result<MediaInfo, ProviderError> {
        Err(ProviderError::Unsupported("fetchInfo"))
    }

    /// Fetch only the episode list of a title
    async fn fetch_episodes_list(
        &self,
        _id: &str,
        _variant: Variant,
    ) -> Result<EpisodeList, ProviderError> {
        Err(ProviderError::Unsupported("fetchEpisodesList"))
    }
}
