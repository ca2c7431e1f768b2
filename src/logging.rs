//! Tracing subscriber setup for processes embedding Crawlkit
//!
//! Library code only emits `tracing` events. A host process that has no
//! subscriber of its own can call [`init_logging`] once at startup.

use crate::config::LoggingConfig;
use crate::ConfigError;
use tracing_subscriber::EnvFilter;

/// Builds the filter for the configured level
///
/// `RUST_LOG` takes precedence over the configured level when it is set.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.level).map_err(|e| {
        ConfigError::Validation(format!("Invalid log level '{}': {}", config.level, e))
    })
}

/// Installs a global `fmt` subscriber
///
/// Returns `Ok(false)` when another subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<bool, ConfigError> {
    let filter = build_filter(config)?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .try_init()
        .is_ok();

    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        let config = LoggingConfig::default();
        assert!(init_logging(&config).is_ok());

        // The second call finds the subscriber from the first one
        assert!(!init_logging(&config).unwrap());
    }

    #[test]
    fn test_build_filter_rejects_bad_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig {
            level: "crawlkit=verbose".to_string(),
        };
        assert!(build_filter(&config).is_err());
    }
}
