//! Time-to-live policy
//!
//! Episode lists change more often on weekdays, when new episodes air, so they
//! are cached longer on Saturdays and Sundays.

use chrono::{Datelike, Local, Weekday};

use crate::config::CacheConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub watch_seconds: u64,
    pub listing_seconds: u64,
    pub weekend_episodes_seconds: u64,
    pub weekday_episodes_seconds: u64,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl TtlPolicy {
    #[must_use]
    pub const fn from_config(config: &CacheConfig) -> Self {
        Self {
            watch_seconds: config.watch_ttl_seconds,
            listing_seconds: config.listing_ttl_seconds,
            weekend_episodes_seconds: config.weekend_episodes_ttl_seconds,
            weekday_episodes_seconds: config.weekday_episodes_ttl_seconds,
        }
    }

    /// TTL for episode lists and info written on `day`
    #[must_use]
    pub fn episodes_ttl(&self, day: &impl Datelike) -> u64 {
        match day.weekday() {
            Weekday::Sat | Weekday::Sun => self.weekend_episodes_seconds,
            _ => self.weekday_episodes_seconds,
        }
    }

    /// TTL for episode lists written now, by the server's local calendar
    #[must_use]
    pub fn episodes_ttl_now(&self) -> u64 {
        self.episodes_ttl(&Local::now())
    }

    #[must_use]
    pub const fn watch_ttl(&self) -> u64 {
        self.watch_seconds
    }

    /// TTL for search pages and other listings
    #[must_use]
    pub const fn listing_ttl(&self) -> u64 {
        self.listing_seconds
    }
}
