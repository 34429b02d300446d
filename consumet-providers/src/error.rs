//! Shared upstream client error types

use thiserror::Error;

pub use reqwest::StatusCode;

/// Maximum response body size for upstream HTTP calls (16 MB).
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Error type for upstream HTTP clients.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP error {status} for {url}")]
    Http { status: StatusCode, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },
}

impl UpstreamError {
    /// Whether the upstream answered but had nothing for the requested id
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Read a response body with size limit and deserialize as JSON.
///
/// Checks `Content-Length` hint first (if available), then enforces the
/// limit on the actual body bytes before deserializing.
pub async fn json_with_limit<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, UpstreamError> {
    if let Some(cl) = response.content_length() {
        if cl as usize > MAX_RESPONSE_SIZE {
            return Err(UpstreamError::ResponseTooLarge { size: cl });
        }
    }
    let bytes = response.bytes().await?;
    if bytes.len() > MAX_RESPONSE_SIZE {
        return Err(UpstreamError::ResponseTooLarge { size: bytes.len() as u64 });
    }
    serde_json::from_slice(&bytes).map_err(Into::into)
}

/// Check HTTP response status before processing body.
pub fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(UpstreamError::Http {
            status,
            url: resp.url().to_string(),
        });
    }
    Ok(resp)
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<url::ParseError> for UpstreamError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidConfig(format!("invalid base URL: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_http() {
        let err = UpstreamError::Http {
            status: StatusCode::NOT_FOUND,
            url: "https://example.com/watch/1".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 404 Not Found for https://example.com/watch/1");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_error_display_response_too_large() {
        let err = UpstreamError::ResponseTooLarge { size: 20_000_000 };
        let msg = err.to_string();
        assert!(msg.contains("20000000"));
        assert!(msg.contains(&MAX_RESPONSE_SIZE.to_string()));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err: UpstreamError = json_err.into();
        assert!(matches!(err, UpstreamError::Parse(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_from_url_parse() {
        let err: UpstreamError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, UpstreamError::InvalidConfig(_)));
    }
}
