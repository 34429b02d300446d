use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than the system
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::NotFound(_))
    }
}

/// Recover an owned error from one shared between single-flight waiters
///
/// Variants wrapping foreign errors keep their message as `Internal`.
impl From<std::sync::Arc<Error>> for Error {
    fn from(shared: std::sync::Arc<Error>) -> Self {
        std::sync::Arc::try_unwrap(shared).unwrap_or_else(|shared| match shared.as_ref() {
            Self::InvalidInput(msg) => Self::InvalidInput(msg.clone()),
            Self::NotFound(msg) => Self::NotFound(msg.clone()),
            Self::Timeout(msg) => Self::Timeout(msg.clone()),
            other => Self::Internal(other.to_string()),
        })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(Error::InvalidInput("bad server".into()).is_client_error());
        assert!(Error::NotFound("no such domain".into()).is_client_error());
        assert!(!Error::Internal("boom".into()).is_client_error());
        assert!(!Error::Timeout("redis get".into()).is_client_error());
    }

    #[test]
    fn test_shared_error_keeps_its_status() {
        let shared = std::sync::Arc::new(Error::NotFound("no providers".into()));
        let _waiter = shared.clone();
        assert!(matches!(Error::from(shared), Error::NotFound(ref m) if m == "no providers"));

        let shared = std::sync::Arc::new(Error::Serialization(
            serde_json::from_str::<u32>("x").unwrap_err(),
        ));
        let _waiter = shared.clone();
        assert!(matches!(Error::from(shared), Error::Internal(_)));
    }

    #[test]
    fn test_display() {
        let err = Error::InvalidInput("unknown server: foo".to_string());
        assert_eq!(err.to_string(), "Invalid input: unknown server: foo");
    }
}
