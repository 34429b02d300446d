//! Per-call resolution input

use crate::provider::{StreamingServer, Variant};
use crate::{Error, Result};

/// Parse a query-string boolean; only `"true"` and `"1"` count as set
#[must_use]
pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some("true" | "1"))
}

/// What the caller wants resolved
///
/// The server hint is kept as the raw caller string so it can be rejected
/// before any provider is touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub content_id: String,
    pub provider_hint: Option<String>,
    pub server_hint: Option<String>,
    pub variant: Variant,
}

impl ResolutionRequest {
    pub fn new(content_id: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Option<impl Into<String>>) -> Self {
        self.provider_hint = non_blank(provider.map(Into::into));
        self
    }

    #[must_use]
    pub fn with_server(mut self, server: Option<impl Into<String>>) -> Self {
        self.server_hint = non_blank(server.map(Into::into));
        self
    }

    #[must_use]
    pub const fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub const fn dub(mut self, dub: bool) -> Self {
        self.variant.dub = dub;
        self
    }

    #[must_use]
    pub const fn fetch_filler(mut self, fetch_filler: bool) -> Self {
        self.variant.fetch_filler = fetch_filler;
        self
    }

    /// Reject an empty id
    pub fn validate(&self) -> Result<()> {
        if self.content_id.trim().is_empty() {
            return Err(Error::InvalidInput("id is required".to_string()));
        }
        Ok(())
    }

    /// Parse the server hint, failing on names outside the known set
    pub fn validated_server(&self) -> Result<Option<StreamingServer>> {
        self.server_hint
            .as_deref()
            .map(str::parse::<StreamingServer>)
            .transpose()
    }

    /// Provider component of cache keys
    #[must_use]
    pub fn provider_key(&self) -> String {
        self.provider_hint
            .as_deref()
            .map_or_else(|| "auto".to_string(), str::to_ascii_lowercase)
    }
}

/// Free-text search input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
    pub provider_hint: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            provider_hint: None,
        }
    }

    /// Page numbers start at 1; zero is bumped up
    #[must_use]
    pub fn page(mut self, page: Option<u32>) -> Self {
        self.page = page.unwrap_or(1).max(1);
        self
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Option<impl Into<String>>) -> Self {
        self.provider_hint = non_blank(provider.map(Into::into));
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Error::InvalidInput("query is required".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn provider_key(&self) -> String {
        self.provider_hint
            .as_deref()
            .map_or_else(|| "auto".to_string(), str::to_ascii_lowercase)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
