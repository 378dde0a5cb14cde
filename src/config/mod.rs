//! Crawl configuration
//!
//! The configuration is assembled from command-line arguments (see
//! `main.rs`) and validated before the coordinator touches the network or
//! the database.

mod types;
mod validation;

pub use types::CrawlConfig;
pub use validation::validate;
