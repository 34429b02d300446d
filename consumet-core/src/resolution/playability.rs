//! Usability checks applied to adapter results
//!
//! A successful adapter call is not enough: a manifest whose sources are all
//! embed pages, or an empty episode list, is treated as a failed attempt.

use regex::Regex;
use std::sync::LazyLock;

use super::attempt::FailureKind;
use crate::provider::{EpisodeList, Manifest, MediaInfo, SearchPage, Source};

/// `.m3u8` or `.mp4` at the end of the URL, optionally followed by a query
static PLAYABLE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(?:m3u8|mp4)(?:\?.*)?$").expect("Invalid playable URL regex")
});

/// Whether a URL looks like an HLS playlist or an MP4 file
#[must_use]
pub fn has_playable_extension(url: &str) -> bool {
    PLAYABLE_URL.is_match(url)
}

/// Playable if the adapter flags it as HLS or the URL has a media extension
#[must_use]
pub fn is_playable(source: &Source) -> bool {
    source.is_m3u8 == Some(true) || has_playable_extension(&source.url)
}

/// Decide whether a successful adapter value ends the resolution
pub trait Usable {
    /// `Err` carries the failure kind and message recorded for the attempt
    fn check_usable(&self) -> Result<(), (FailureKind, String)>;
}

impl Usable for Manifest {
    fn check_usable(&self) -> Result<(), (FailureKind, String)> {
        if self.playable_sources().next().is_some() {
            Ok(())
        } else {
            Err((FailureKind::NoPlayableSources, "No playable sources".to_string()))
        }
    }
}

impl Usable for EpisodeList {
    fn check_usable(&self) -> Result<(), (FailureKind, String)> {
        if self.episodes.is_empty() {
            Err((FailureKind::EmptyResult, "No episodes returned".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Usable for MediaInfo {
    fn check_usable(&self) -> Result<(), (FailureKind, String)> {
        Ok(())
    }
}

impl Usable for SearchPage {
    fn check_usable(&self) -> Result<(), (FailureKind, String)> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(url: &str, flag: Option<bool>) -> Source {
        Source {
            url: url.to_string(),
            quality: None,
            is_m3u8: flag,
        }
    }

    #[test]
    fn test_extension_matching() {
        assert!(has_playable_extension("http://x/a.m3u8"));
        assert!(has_playable_extension("http://x/a.M3U8?token=1"));
        assert!(has_playable_extension("http://x/a.mp4"));
        assert!(has_playable_extension("http://x/a.MP4?"));
        assert!(!has_playable_extension("http://x/a.m3u8.html"));
        assert!(!has_playable_extension("http://x/embed/123"));
        assert!(!has_playable_extension("http://x/a.mkv"));
    }

    #[test]
    fn test_flag_overrides_url_shape() {
        assert!(is_playable(&source("http://x/embed/123", Some(true))));
        assert!(!is_playable(&source("http://x/embed/123", Some(false))));
        assert!(is_playable(&source("http://x/a.mp4", Some(false))));
    }

    #[test]
    fn test_manifest_without_playable_source() {
        let manifest = Manifest::from_sources([source("http://x/embed.html", None)]);
        let (kind, _) = manifest.check_usable().unwrap_err();
        assert_eq!(kind, FailureKind::NoPlayableSources);

        let (kind, _) = Manifest::default().check_usable().unwrap_err();
        assert_eq!(kind, FailureKind::NoPlayableSources);
    }

    #[test]
    fn test_empty_episode_list() {
        let (kind, _) = EpisodeList::default().check_usable().unwrap_err();
        assert_eq!(kind, FailureKind::EmptyResult);
    }
}
