//! Upstream HTTP Client
//!
//! Pure HTTP client for the upstream JSON API, no dependency on `ProviderAdapter`

use std::sync::Arc;
use std::time::Duration;

use reqwest::{cookie::Jar, header::{HeaderMap, HeaderValue, ACCEPT}, Client};
use url::Url;

use super::types::{EpisodeItem, InfoResponse, SearchResponse, SourcesResponse};
use crate::error::{check_response, json_with_limit, UpstreamError};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) consumet-rs";

/// Builder for [`UpstreamClient`]
#[derive(Debug, Clone)]
pub struct UpstreamClientBuilder {
    base_url: String,
    proxy: Option<String>,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl UpstreamClientBuilder {
    /// Route every request through the given proxy URL
    #[must_use]
    pub fn proxy(mut self, proxy: Option<impl Into<String>>) -> Self {
        self.proxy = proxy.map(Into::into);
        self
    }

    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the client with a fresh cookie jar
    pub fn build(self) -> Result<UpstreamClient, UpstreamError> {
        let mut base_url = Url::parse(&self.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidConfig(format!(
                "{} cannot be used as a base URL",
                self.base_url
            )));
        }
        // Trailing slash keeps endpoint joins relative to the full path
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .cookie_provider(Arc::new(Jar::default()))
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout);

        if let Some(ref proxy) = self.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| UpstreamError::InvalidConfig(format!("invalid proxy {proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| UpstreamError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(UpstreamClient { base_url, client })
    }
}

/// Upstream HTTP Client
///
/// Provides methods for the four content operations of the upstream API:
/// - `GET /watch/{episodeId}` (episode sources)
/// - `GET /episodes/{id}` (episode list)
/// - `GET /info/{id}` (media info)
/// - `GET /{query}` (search)
pub struct UpstreamClient {
    base_url: Url,
    client: Client,
}

impl UpstreamClient {
    /// Create a client with default timeouts and no proxy
    pub fn new(base_url: impl Into<String>) -> Result<Self, UpstreamError> {
        Self::builder(base_url).build()
    }

    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> UpstreamClientBuilder {
        UpstreamClientBuilder {
            base_url: base_url.into(),
            proxy: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Build an endpoint URL, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| UpstreamError::InvalidConfig("base URL cannot have segments".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        tracing::debug!(url = %url, "Upstream request");
        let response = self.client.get(url).query(query).send().await?;
        let response = check_response(response)?;
        json_with_limit(response).await
    }

    /// Fetch streaming sources for one episode
    ///
    /// # Arguments
    /// * `episode_id` - Upstream episode identifier
    /// * `server` - Optional streaming server name (e.g. "vidcloud")
    /// * `dub` - Request the dubbed variant where the upstream has one
    pub async fn watch(
        &self,
        episode_id: &str,
        server: Option<&str>,
        dub: bool,
    ) -> Result<SourcesResponse, UpstreamError> {
        let url = self.endpoint(&["watch", episode_id])?;
        let mut query = vec![("dub", dub.to_string())];
        if let Some(server) = server {
            query.push(("server", server.to_string()));
        }
        self.get_json(url, &query).await
    }

    /// Fetch the episode list of a title
    pub async fn episodes(
        &self,
        id: &str,
        dub: bool,
        fetch_filler: bool,
    ) -> Result<Vec<EpisodeItem>, UpstreamError> {
        let url = self.endpoint(&["episodes", id])?;
        let query = [("dub", dub.to_string()), ("fetchFiller", fetch_filler.to_string())];
        self.get_json(url, &query).await
    }

    /// Fetch title information including episodes
    pub async fn info(
        &self,
        id: &str,
        dub: bool,
        fetch_filler: bool,
    ) -> Result<InfoResponse, UpstreamError> {
        let url = self.endpoint(&["info", id])?;
        let query = [("dub", dub.to_string()), ("fetchFiller", fetch_filler.to_string())];
        self.get_json(url, &query).await
    }

    /// Search titles by free text
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchResponse, UpstreamError> {
        let url = self.endpoint(&[query])?;
        self.get_json(url, &[("page", page.to_string())]).await
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = UpstreamClient::new("https://api.example.com/anime/zoro").unwrap();
        let url = client.endpoint(&["watch", "spy-x-family$episode$1 2"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/anime/zoro/watch/spy-x-family$episode$1%202"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_base() {
        let client = UpstreamClient::new("https://api.example.com/").unwrap();
        let url = client.endpoint(&["info", "21"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/info/21");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            UpstreamClient::new("::nope::"),
            Err(UpstreamError::InvalidConfig(_))
        ));
        assert!(matches!(
            UpstreamClient::new("mailto:someone@example.com"),
            Err(UpstreamError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_proxy() {
        let result = UpstreamClient::builder("https://api.example.com")
            .proxy(Some("::bad proxy::"))
            .build();
        assert!(matches!(result, Err(UpstreamError::InvalidConfig(_))));
    }
}
