//! Recognized streaming servers
//!
//! A server hint outside this set is a validation failure, detected before
//! any adapter runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamingServer {
    AsianLoad,
    GogoCdn,
    StreamSb,
    MixDrop,
    Mp4Upload,
    UpCloud,
    VidCloud,
    StreamTape,
    VizCloud,
    MyCloud,
    Filemoon,
    VidStreaming,
    SmashyStream,
    StreamHub,
    StreamWish,
    VidMoly,
    MegaCloud,
}

impl StreamingServer {
    pub const ALL: [Self; 17] = [
        Self::AsianLoad,
        Self::GogoCdn,
        Self::StreamSb,
        Self::MixDrop,
        Self::Mp4Upload,
        Self::UpCloud,
        Self::VidCloud,
        Self::StreamTape,
        Self::VizCloud,
        Self::MyCloud,
        Self::Filemoon,
        Self::VidStreaming,
        Self::SmashyStream,
        Self::StreamHub,
        Self::StreamWish,
        Self::VidMoly,
        Self::MegaCloud,
    ];

    /// Wire name understood by upstreams
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AsianLoad => "asianload",
            Self::GogoCdn => "gogocdn",
            Self::StreamSb => "streamsb",
            Self::MixDrop => "mixdrop",
            Self::Mp4Upload => "mp4upload",
            Self::UpCloud => "upcloud",
            Self::VidCloud => "vidcloud",
            Self::StreamTape => "streamtape",
            Self::VizCloud => "vizcloud",
            Self::MyCloud => "mycloud",
            Self::Filemoon => "filemoon",
            Self::VidStreaming => "vidstreaming",
            Self::SmashyStream => "smashystream",
            Self::StreamHub => "streamhub",
            Self::StreamWish => "streamwish",
            Self::VidMoly => "vidmoly",
            Self::MegaCloud => "megacloud",
        }
    }
}

impl fmt::Display for StreamingServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamingServer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|server| server.as_str() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid server: {s}")))
    }
}
