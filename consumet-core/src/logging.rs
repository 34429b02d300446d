//! Logging setup
//!
//! Without `RUST_LOG`, the consumet crates and HTTP request traces log at the
//! configured level while dependencies (redis, reqwest, hyper) stay at `warn`.

use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Targets that follow the configured level
const SERVICE_TARGETS: [&str; 5] = [
    "consumet",
    "consumet_core",
    "consumet_api",
    "consumet_providers",
    "tower_http",
];

/// Install the global subscriber: JSON or pretty, stdout or an append-only file
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directives(level)))?;

    let writer = match &config.file_path {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            BoxMakeWriter::new(Arc::new(file))
        }
        None => BoxMakeWriter::new(std::io::stdout),
    };
    let ansi = config.file_path.is_none();

    // Exactly one of the two layers is installed
    let (json, pretty) = if config.format == "json" {
        let layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_writer(writer);
        (Some(layer), None)
    } else {
        let layer = fmt::layer()
            .pretty()
            .with_ansi(ansi)
            .with_target(true)
            .with_file(false)
            .with_writer(writer);
        (None, Some(layer))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .try_init()?;
    Ok(())
}

/// `warn` for everything, `level` for the service's own targets
fn default_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    SERVICE_TARGETS
        .iter()
        .fold("warn".to_string(), |acc, target| format!("{acc},{target}={level}"))
}

fn parse_log_level(level: &str) -> anyhow::Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(anyhow::anyhow!("Invalid log level: {level}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("INFO").unwrap(), Level::INFO);
        assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
        assert!(parse_log_level("loud").is_err());
    }

    #[test]
    fn test_default_directives_scope_service_crates() {
        let directives = default_directives(Level::DEBUG);
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("consumet_core=debug"));
        assert!(directives.contains("tower_http=debug"));
        assert!(!directives.contains("redis"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn test_init_rejects_bad_level() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..LoggingConfig::default()
        };
        assert!(init_logging(&config).is_err());
    }
}
