use serde::Deserialize;

/// Main configuration structure for Crawlkit
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub language: LanguageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP client settings for detail-page retrieval
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds; no timeout when absent
    #[serde(rename = "timeout-secs", default)]
    pub timeout_secs: Option<u64>,

    /// Connect timeout in seconds; no timeout when absent
    #[serde(rename = "connect-timeout-secs", default)]
    pub connect_timeout_secs: Option<u64>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: None,
            connect_timeout_secs: None,
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Collection holding task documents
    #[serde(rename = "task-collection", default = "default_task_collection")]
    pub task_collection: String,
}

/// Default windows for the aggregate statistics queries
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// How many of the most recent tasks to inspect for failures
    #[serde(rename = "recent-tasks", default = "default_recent_tasks")]
    pub recent_tasks: usize,

    /// Width of the trailing task-count window in days
    #[serde(rename = "trailing-days", default = "default_trailing_days")]
    pub trailing_days: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            recent_tasks: default_recent_tasks(),
            trailing_days: default_trailing_days(),
        }
    }
}

/// Language classifier settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageConfig {
    /// Suffixes ignored in addition to the built-in list
    #[serde(rename = "ignore-suffixes", default)]
    pub ignore_suffixes: Vec<String>,
}

/// Log output settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. "info" or "crawlkit=debug,warn"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_user_agent() -> String {
    format!("crawlkit/{}", env!("CARGO_PKG_VERSION"))
}

fn default_task_collection() -> String {
    "tasks".to_string()
}

fn default_recent_tasks() -> usize {
    5
}

fn default_trailing_days() -> u32 {
    7
}

fn default_log_level() -> String {
    "info".to_string()
}
