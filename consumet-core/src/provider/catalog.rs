//! Compile-time provider catalog
//!
//! Entry order within a domain is the curated fallback order. Entries marked
//! `enabled: false` stay listed for documentation but never reach the
//! registry; a broken upstream is taken out here rather than patched at
//! runtime.

use super::{Capability, ContentDomain};

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub domain: ContentDomain,
    pub name: &'static str,
    pub capabilities: &'static [Capability],
    pub enabled: bool,
    /// Legacy environment variable overriding the base URL
    pub base_url_env: Option<&'static str>,
}

const STREAMING: &[Capability] = &[
    Capability::Search,
    Capability::FetchInfo,
    Capability::FetchEpisodesList,
    Capability::FetchEpisodeSources,
];

const LISTING: &[Capability] = &[Capability::Search, Capability::FetchInfo];

const SEARCH_ONLY: &[Capability] = &[Capability::Search];

const fn entry(
    domain: ContentDomain,
    name: &'static str,
    capabilities: &'static [Capability],
    enabled: bool,
) -> CatalogEntry {
    CatalogEntry {
        domain,
        name,
        capabilities,
        enabled,
        base_url_env: None,
    }
}

pub const CATALOG: &[CatalogEntry] = &[
    // Anime
    CatalogEntry {
        base_url_env: Some("ZORO_URL"),
        ..entry(ContentDomain::Anime, "zoro", STREAMING, true)
    },
    CatalogEntry {
        base_url_env: Some("GOGOANIME_URL"),
        ..entry(ContentDomain::Anime, "gogoanime", STREAMING, true)
    },
    entry(ContentDomain::Anime, "animepahe", STREAMING, false),
    entry(ContentDomain::Anime, "9anime", STREAMING, false),
    entry(ContentDomain::Anime, "animefox", STREAMING, false),
    entry(ContentDomain::Anime, "anify", STREAMING, false),
    entry(ContentDomain::Anime, "crunchyroll", STREAMING, false),
    entry(ContentDomain::Anime, "bilibili", STREAMING, false),
    entry(ContentDomain::Anime, "marin", STREAMING, false),
    entry(ContentDomain::Anime, "anix", STREAMING, false),
    entry(ContentDomain::Anime, "animeowl", STREAMING, false),
    // Movies
    entry(ContentDomain::Movies, "flixhq", STREAMING, true),
    entry(ContentDomain::Movies, "viewasian", STREAMING, true),
    entry(ContentDomain::Movies, "dramacool", STREAMING, true),
    entry(ContentDomain::Movies, "fmovies", STREAMING, true),
    entry(ContentDomain::Movies, "goku", STREAMING, true),
    entry(ContentDomain::Movies, "movieshd", STREAMING, true),
    entry(ContentDomain::Movies, "sflix", STREAMING, true),
    entry(ContentDomain::Movies, "multimovies", STREAMING, true),
    // Meta
    entry(ContentDomain::Meta, "anilist", STREAMING, true),
    entry(ContentDomain::Meta, "anilist-manga", LISTING, true),
    entry(ContentDomain::Meta, "mal", STREAMING, true),
    entry(ContentDomain::Meta, "tmdb", STREAMING, true),
    // Manga
    entry(ContentDomain::Manga, "mangahere", LISTING, true),
    // Light novels
    entry(ContentDomain::LightNovels, "readlightnovels", LISTING, true),
    // Books
    entry(ContentDomain::Books, "libgen", SEARCH_ONLY, true),
    // News
    entry(ContentDomain::News, "ann", LISTING, true),
];

/// Enabled entries, in catalog order
pub fn enabled() -> impl Iterator<Item = &'static CatalogEntry> {
    CATALOG.iter().filter(|e| e.enabled)
}

/// Curated fallback order of a domain
#[must_use]
pub fn default_order(domain: ContentDomain) -> Vec<&'static str> {
    enabled()
        .filter(|e| e.domain == domain)
        .map(|e| e.name)
        .collect()
}
