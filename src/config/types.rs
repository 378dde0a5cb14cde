use crate::query::DATA_ENDPOINT;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for one crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// First date to fetch
    pub start_date: NaiveDate,

    /// Last date to fetch, inclusive
    pub end_date: NaiveDate,

    /// Number of concurrent fetch workers
    pub max_tasks: usize,

    /// Attempts per item before a transient failure becomes terminal
    pub max_tries: u32,

    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Base URL of the data endpoint
    pub endpoint: String,

    /// Per-request timeout; a timed-out request counts as a failed attempt
    pub request_timeout: Duration,

    /// Delay before the first retry; doubles on each subsequent attempt
    pub retry_delay: Duration,
}

impl CrawlConfig {
    /// Creates a configuration for the given date range with default
    /// concurrency, retry, and storage settings.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            max_tasks: 10,
            max_tries: 4,
            database_path: PathBuf::from("tw-aquaculture-market.sqlite"),
            endpoint: DATA_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(30),
            retry_delay: Duration::from_millis(500),
        }
    }
}
