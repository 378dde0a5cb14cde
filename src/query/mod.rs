//! Query construction for the remote endpoint
//!
//! Turns a calendar date into the URL the endpoint expects, including the
//! ROC-calendar date encoding.

mod endpoint;
mod roc;

pub use endpoint::{build_query_url, DATA_ENDPOINT};
pub use roc::roc_query_date;
