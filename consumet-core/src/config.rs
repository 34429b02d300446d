use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub redis: RedisConfig,
    pub cache: CacheConfig,
    pub resolution: ResolutionConfig,
    pub providers: ProvidersConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
            cors_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Empty disables Redis
    pub url: String,
    pub key_prefix: String,
    pub connect_timeout_seconds: u64,
    pub operation_timeout_seconds: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            key_prefix: "consumet".to_string(),
            connect_timeout_seconds: 5,
            operation_timeout_seconds: 2,
        }
    }
}

/// Result cache policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Use an in-process cache when Redis is not configured or unreachable
    pub memory_fallback: bool,
    pub memory_capacity: u64,
    /// Concurrent requests for the same key share one resolution and its outcome
    pub single_flight: bool,
    pub watch_ttl_seconds: u64,
    pub listing_ttl_seconds: u64,
    pub weekend_episodes_ttl_seconds: u64,
    pub weekday_episodes_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            memory_fallback: true,
            memory_capacity: 10_000,
            single_flight: true,
            watch_ttl_seconds: 10 * 60,
            listing_ttl_seconds: 60 * 60,
            weekend_episodes_ttl_seconds: 60 * 120,
            weekday_episodes_ttl_seconds: 60 * 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Upper bound for a single adapter call
    pub attempt_timeout_seconds: u64,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_seconds: 20,
        }
    }
}

/// Upstream endpoints for provider adapters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Provider name -> upstream base URL
    pub upstreams: BTreeMap<String, String>,
    /// Proxy URLs; one is picked per adapter instance
    pub proxy: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // CONSUMET_REDIS__URL, CONSUMET_PROVIDERS__UPSTREAMS__ZORO, ...
        builder = builder.add_source(
            Environment::with_prefix("CONSUMET")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .with_list_parse_key("providers.proxy")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Whether a Redis backend should be attempted
    #[must_use]
    pub fn redis_enabled(&self) -> bool {
        self.cache.enabled && !self.redis.url.is_empty()
    }

    /// Get HTTP listen address
    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Validate the whole configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be non-zero".to_string());
        }
        if self.resolution.attempt_timeout_seconds == 0 {
            errors.push("resolution.attempt_timeout_seconds must be at least 1".to_string());
        }
        if self.cache.enabled && self.cache.memory_fallback && self.cache.memory_capacity == 0 {
            errors.push("cache.memory_capacity must be non-zero when memory_fallback is on".to_string());
        }
        if !self.redis.url.is_empty() && url::Url::parse(&self.redis.url).is_err() {
            errors.push(format!("redis.url is not a valid URL: {}", self.redis.url));
        }
        for (name, base) in &self.providers.upstreams {
            if name.to_lowercase() != *name {
                errors.push(format!("providers.upstreams key must be lowercase: {name}"));
            }
            if url::Url::parse(base).is_err() {
                errors.push(format!("providers.upstreams.{name} is not a valid URL: {base}"));
            }
        }
        for proxy in &self.providers.proxy {
            if url::Url::parse(proxy).is_err() {
                errors.push(format!("providers.proxy entry is not a valid URL: {proxy}"));
            }
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!("logging.format must be json or pretty, got {}", self.logging.format));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
