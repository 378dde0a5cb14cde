//! Crawler module for fetching and processing daily transaction data
//!
//! This module contains the crawl logic proper:
//! - work item construction (one per calendar date)
//! - HTTP fetching with retry and outcome classification
//! - payload parsing into records
//! - the worker pool and the coordinator that drives it

mod coordinator;
mod fetcher;
mod parser;
mod stats;
mod worker;

pub use coordinator::{date_range, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_url, FetchOutcome, NetworkErrorKind};
pub use parser::{parse_records, ParseError, Record};
pub use stats::{CrawlStats, StatsSnapshot};
pub use worker::FetchWorker;

use crate::query::build_query_url;
use chrono::NaiveDate;
use url::Url;

/// One unit of crawl work: a calendar date and its prepared request URL.
///
/// Immutable once enqueued; the queue owns it until exactly one worker
/// dequeues it for a fetch-parse-persist cycle.
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// The date this item covers
    pub date: NaiveDate,

    /// The fully built request URL
    pub url: Url,
}

impl WorkItem {
    /// Builds the work item for one date against the given endpoint.
    pub fn for_date(endpoint: &str, date: NaiveDate) -> Result<Self, url::ParseError> {
        Ok(Self {
            date,
            url: build_query_url(endpoint, date)?,
        })
    }
}
