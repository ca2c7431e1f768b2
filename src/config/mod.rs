//! Configuration module for Crawlkit
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use crawlkit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawlkit.toml")).unwrap();
//! println!("Tasks live in: {}", config.storage.task_collection);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetcherConfig, LanguageConfig, LoggingConfig, StatsConfig, StorageConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
