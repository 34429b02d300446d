//! Timeout configuration for calls leaving the process
//!
//! Upstream adapters and the cache backend are the only places a request
//! waits on something external; both are bounded by these values.

pub mod timeout {
    use std::future::Future;
    use std::time::Duration;

    use crate::config::Config;
    use crate::{Error, Result};

    /// Default upper bound for one adapter attempt
    pub const ADAPTER_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(20);

    /// Default timeout for cache backend operations
    pub const CACHE_OPERATION_TIMEOUT: Duration = Duration::from_secs(2);

    /// Default timeout for establishing the Redis connection
    pub const REDIS_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Timeout configuration
    #[derive(Debug, Clone, Copy)]
    pub struct TimeoutConfig {
        pub adapter_attempt: Duration,
        pub cache_operation: Duration,
        pub redis_connect: Duration,
    }

    impl Default for TimeoutConfig {
        fn default() -> Self {
            Self {
                adapter_attempt: ADAPTER_ATTEMPT_TIMEOUT,
                cache_operation: CACHE_OPERATION_TIMEOUT,
                redis_connect: REDIS_CONNECT_TIMEOUT,
            }
        }
    }

    impl TimeoutConfig {
        #[must_use]
        pub fn from_config(config: &Config) -> Self {
            Self {
                adapter_attempt: Duration::from_secs(config.resolution.attempt_timeout_seconds),
                cache_operation: Duration::from_secs(config.redis.operation_timeout_seconds),
                redis_connect: Duration::from_secs(config.redis.connect_timeout_seconds),
            }
        }
    }

    /// Run `fut` under `limit`, mapping expiry to [`Error::Timeout`]
    pub async fn with_timeout<T, F>(limit: Duration, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!("{what} exceeded {}ms", limit.as_millis()))),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_from_config() {
            let mut config = Config::default();
            config.resolution.attempt_timeout_seconds = 15;
            let timeouts = TimeoutConfig::from_config(&config);
            assert_eq!(timeouts.adapter_attempt, Duration::from_secs(15));
            assert_eq!(timeouts.cache_operation, Duration::from_secs(2));
        }

        #[tokio::test(start_paused = true)]
        async fn test_with_timeout_expires() {
            let result: Result<()> = with_timeout(Duration::from_secs(1), "redis GET", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
            assert!(matches!(result, Err(Error::Timeout(msg)) if msg.contains("redis GET")));
        }

        #[tokio::test]
        async fn test_with_timeout_passes_through() {
            let result = with_timeout(Duration::from_secs(1), "noop", async { Ok(7) }).await;
            assert_eq!(result.unwrap(), 7);
        }
    }
}
