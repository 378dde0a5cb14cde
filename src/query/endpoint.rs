//! Request URL construction
//!
//! The endpoint serves one day of transactions when queried with equal
//! `StartDate` and `EndDate` parameters, which is how the crawler always
//! calls it: one request per calendar date.

use crate::query::roc::roc_query_date;
use chrono::NaiveDate;
use url::Url;

/// The COA aquatic transaction open-data endpoint.
pub const DATA_ENDPOINT: &str = "http://m.coa.gov.tw/OpenData/AquaticTransData.aspx";

/// Builds the request URL for one day of data.
pub fn build_query_url(endpoint: &str, date: NaiveDate) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(endpoint)?;
    let query_date = roc_query_date(date);
    url.query_pairs_mut()
        .append_pair("StartDate", &query_date)
        .append_pair("EndDate", &query_date);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_single_day_query() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let url = build_query_url(DATA_ENDPOINT, date).unwrap();

        assert_eq!(url.host_str(), Some("m.coa.gov.tw"));
        assert_eq!(url.path(), "/OpenData/AquaticTransData.aspx");
        assert_eq!(
            url.query(),
            Some("StartDate=1090101&EndDate=1090101")
        );
    }

    #[test]
    fn respects_an_overridden_endpoint() {
        let date = NaiveDate::from_ymd_opt(2018, 6, 15).unwrap();
        let url = build_query_url("http://127.0.0.1:9000/data", date).unwrap();

        assert_eq!(url.as_str(), "http://127.0.0.1:9000/data?StartDate=1070615&EndDate=1070615");
    }

    #[test]
    fn rejects_an_unparseable_endpoint() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(build_query_url("not a url", date).is_err());
    }
}
