//! Crawlkit: helper utilities for a crawl management platform
//!
//! This crate expands templated URL patterns, extracts structured rows from
//! HTML with CSS or path selectors, sniffs the language and framework of a
//! spider directory, and computes task statistics from a document store.

pub mod config;
pub mod extract;
pub mod logging;
pub mod pattern;
pub mod sniff;
pub mod stats;
pub mod storage;

use thiserror::Error;

/// Main error type for Crawlkit operations
#[derive(Debug, Error)]
pub enum CrawlkitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] PatternError),

    #[error("Selector error: {0}")]
    Selector(#[from] SelectorError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Store error: {0}")]
    Store(#[from] storage::StorageError),

    #[error("Row index {index} out of range for {len} rows")]
    RowIndex { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Malformed URL pattern placeholders
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("{template} is not a valid URL pattern: bad range bound '{bound}'")]
    InvalidBound { template: String, bound: String },
}

/// Malformed or unsupported selector queries
#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("Invalid CSS selector '{query}': {message}")]
    Css { query: String, message: String },

    #[error("Invalid path selector '{query}': {message}")]
    Path { query: String, message: String },
}

/// Network failures while retrieving a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: ::url::ParseError,
    },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Failed to read body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Result type alias for Crawlkit operations
pub type Result<T> = std::result::Result<T, CrawlkitError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{extract_detail, extract_list, fetch_detail, merge_row, FieldSpec, Row, SpiderSpec};
pub use pattern::{expand_urls, UrlPattern};
pub use sniff::{classify_language, detect_framework, Framework, Language};
pub use stats::{load_spider_stats, recent_failure_count, trailing_task_count, SpiderStats, TaskStatus};
pub use storage::{DocumentStore, SqliteStore};
