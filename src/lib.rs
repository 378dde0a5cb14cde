//! Aquatrans: a Taiwan aquatic market transaction crawler
//!
//! This crate fetches one day of aquatic market transaction data per
//! calendar date in a range, parses the JSON payloads, and persists the
//! records to SQLite. Concurrency is bounded by a fixed pool of fetch
//! workers draining a joinable work queue; transient network failures are
//! retried with backoff.

pub mod config;
pub mod crawler;
pub mod query;
pub mod runtime;
pub mod storage;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{Coordinator, CrawlReport, Record, WorkItem};
pub use runtime::{Promise, Resolver, Task, WorkQueue};
