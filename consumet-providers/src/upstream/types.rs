//! Upstream wire types
//!
//! Field names follow the upstream camelCase JSON dialect. Unknown fields are
//! ignored; every optional field tolerates being absent.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One candidate media source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceItem {
    pub url: String,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default, rename = "isM3U8")]
    pub is_m3u8: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleItem {
    pub url: String,
    #[serde(default)]
    pub lang: Option<String>,
}

/// Opening/ending markers in seconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: u64,
    pub end: u64,
}

/// Response of `GET /watch/{episodeId}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcesResponse {
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub sources: Vec<SourceItem>,
    #[serde(default)]
    pub subtitles: Vec<SubtitleItem>,
    #[serde(default)]
    pub intro: Option<TimeRange>,
    #[serde(default)]
    pub outro: Option<TimeRange>,
    #[serde(default)]
    pub download: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeItem {
    pub id: String,
    #[serde(default)]
    pub number: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_filler: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
}

/// Titles come back either as a plain string or as a romaji/english/native map
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TitleItem {
    Plain(String),
    Localized(HashMap<String, Option<String>>),
}

impl TitleItem {
    /// Best single display string
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Plain(title) => title.clone(),
            Self::Localized(map) => ["english", "romaji", "native", "userPreferred"]
                .iter()
                .find_map(|k| map.get(*k).cloned().flatten())
                .unwrap_or_default(),
        }
    }
}

/// Response of `GET /info/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub id: String,
    #[serde(default)]
    pub title: Option<TitleItem>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_episodes: Option<u32>,
    #[serde(default)]
    pub episodes: Vec<EpisodeItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub id: String,
    #[serde(default)]
    pub title: Option<TitleItem>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Response of `GET /{query}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub has_next_page: Option<bool>,
    #[serde(default)]
    pub results: Vec<SearchItem>,
}
