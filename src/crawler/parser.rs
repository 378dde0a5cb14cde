//! Response payload parsing
//!
//! The endpoint returns a JSON array of daily transaction entries keyed by
//! Chinese field names; this module maps them onto [`Record`]s. Anything
//! that is not JSON by content type yields an empty record set rather than
//! an error; the endpoint serves placeholder pages for dates with no
//! data, and those are simply nothing to store. A payload that *claims* to
//! be JSON but does not parse is a real anomaly and is reported as a
//! [`ParseError`].

use serde::Deserialize;
use thiserror::Error;

/// Errors from interpreting a response payload
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// One aquatic market transaction, as stored.
///
/// The `date` field keeps the payload's ROC-formatted transaction date
/// verbatim; it is stored as text, not reinterpreted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    /// Fish type name (魚貨名稱)
    #[serde(rename = "魚貨名稱")]
    pub type_name: String,

    /// Fish type code (品種代碼)
    #[serde(rename = "品種代碼")]
    pub type_code: i64,

    /// Market name (市場名稱)
    #[serde(rename = "市場名稱")]
    pub market_name: String,

    /// Highest transaction price (上價)
    #[serde(rename = "上價")]
    pub high_price: f64,

    /// Lowest transaction price (下價)
    #[serde(rename = "下價")]
    pub low_price: f64,

    /// Middle transaction price (中價)
    #[serde(rename = "中價")]
    pub mid_price: f64,

    /// Average transaction price (平均價)
    #[serde(rename = "平均價")]
    pub avg_price: f64,

    /// Transaction date, ROC calendar (交易日期)
    #[serde(rename = "交易日期")]
    pub date: String,

    /// Transaction volume (交易量)
    #[serde(rename = "交易量")]
    pub trans_amount: f64,
}

/// Parses a response body into records.
///
/// Non-JSON content types produce `Ok(vec![])`; malformed JSON produces a
/// `ParseError`, which the worker treats as terminal for the item (never
/// retried).
pub fn parse_records(content_type: &str, body: &[u8]) -> Result<Vec<Record>, ParseError> {
    if !is_json_content_type(content_type) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(body)?)
}

fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence == "text/json" || essence.ends_with("+json")
}
