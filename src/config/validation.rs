use crate::config::types::{
    Config, FetcherConfig, LanguageConfig, LoggingConfig, StatsConfig, StorageConfig,
};
use crate::storage::is_valid_name;
use crate::ConfigError;
use tracing_subscriber::EnvFilter;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_storage_config(&config.storage)?;
    validate_stats_config(&config.stats)?;
    validate_language_config(&config.language)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1 when set".to_string(),
        ));
    }

    if config.connect_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if !is_valid_name(&config.task_collection) {
        return Err(ConfigError::Validation(format!(
            "task_collection must contain only alphanumeric characters and underscores, got '{}'",
            config.task_collection
        )));
    }

    Ok(())
}

/// Validates statistics windows
fn validate_stats_config(config: &StatsConfig) -> Result<(), ConfigError> {
    if config.recent_tasks < 1 {
        return Err(ConfigError::Validation(format!(
            "recent_tasks must be >= 1, got {}",
            config.recent_tasks
        )));
    }

    if config.trailing_days < 1 {
        return Err(ConfigError::Validation(format!(
            "trailing_days must be >= 1, got {}",
            config.trailing_days
        )));
    }

    Ok(())
}

/// Validates extra ignore suffixes
fn validate_language_config(config: &LanguageConfig) -> Result<(), ConfigError> {
    for suffix in &config.ignore_suffixes {
        if suffix.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Validation(
                "ignore_suffixes cannot contain empty entries".to_string(),
            ));
        }
    }
    Ok(())
}

/// Validates the log filter directive
fn validate_logging_config(config: &LoggingConfig) -> Result<(), ConfigError> {
    EnvFilter::try_new(&config.level).map_err(|e| {
        ConfigError::Validation(format!("Invalid log level '{}': {}", config.level, e))
    })?;
    Ok(())
}
