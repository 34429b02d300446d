// Provider Error Types

use consumet_providers::UpstreamError;

/// Failure of a single adapter call
///
/// Never surfaced to callers directly; the resolution engine records the
/// message against the attempt and moves on to the next provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Upstream returned HTTP {status}")]
    Http { status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Provider API error: {0}")]
    Api(String),
}

impl From<UpstreamError> for ProviderError {
    fn from(err: UpstreamError) -> Self {
        match err {
            e if e.is_not_found() => Self::NotFound,
            UpstreamError::Network(msg) => Self::Network(msg),
            UpstreamError::Timeout(msg) => Self::Timeout(msg),
            UpstreamError::Http { status, .. } => Self::Http { status: status.as_u16() },
            UpstreamError::Parse(msg) => Self::Parse(msg),
            UpstreamError::InvalidConfig(msg) => Self::InvalidConfig(msg),
            e @ UpstreamError::ResponseTooLarge { .. } => Self::Api(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use consumet_providers::error::StatusCode;

    fn http_error(code: u16) -> UpstreamError {
        UpstreamError::Http {
            status: StatusCode::from_u16(code).unwrap(),
            url: "http://x/watch/1".to_string(),
        }
    }

    #[test]
    fn test_from_upstream_error() {
        let err: ProviderError = http_error(404).into();
        assert!(matches!(err, ProviderError::NotFound));

        let err: ProviderError = http_error(503).into();
        assert_eq!(err.to_string(), "Upstream returned HTTP 503");

        let err: ProviderError = UpstreamError::Timeout("30s".to_string()).into();
        assert!(matches!(err, ProviderError::Timeout(_)));
    }
}
