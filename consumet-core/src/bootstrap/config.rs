//! Configuration loading

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::Config;

/// Load configuration from config file or environment variables
///
/// Config file search order:
/// 1. Explicit path (`--config`)
/// 2. `CONSUMET_CONFIG_PATH` environment variable
/// 3. ./config.yaml (current working directory)
/// 4. Fall back to environment variables only
///
/// Runs before logging is initialised, so progress goes to stderr.
pub fn load_config(explicit_path: Option<&str>) -> Result<Config> {
    let config_path = explicit_path
        .map(ToString::to_string)
        .or_else(|| std::env::var("CONSUMET_CONFIG_PATH").ok())
        .filter(|p| Path::new(p).exists())
        .or_else(|| {
            let cwd = "config.yaml";
            Path::new(cwd).exists().then(|| cwd.to_string())
        });

    let config = if let Some(path) = config_path {
        eprintln!("Loading config from {path}");
        Config::from_file(&path)?
    } else {
        eprintln!("No config file found, using environment variables");
        Config::from_env()?
    };

    // Fail fast on misconfiguration
    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Config validation error: {error}");
        }
        return Err(anyhow::anyhow!(
            "Configuration validation failed with {} error(s): {}",
            errors.len(),
            errors.join("; ")
        ));
    }

    Ok(config)
}

/// Log the effective settings once logging is up
pub fn log_summary(config: &Config) {
    info!("HTTP address: {}", config.http_address());
    info!(
        redis = config.redis_enabled(),
        memory_fallback = config.cache.memory_fallback,
        single_flight = config.cache.single_flight,
        "Result cache settings"
    );
    info!(
        attempt_timeout_seconds = config.resolution.attempt_timeout_seconds,
        upstreams = config.providers.upstreams.len(),
        proxies = config.providers.proxy.len(),
        "Provider settings"
    );
}
