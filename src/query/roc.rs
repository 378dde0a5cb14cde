//! ROC calendar query-date formatting
//!
//! The COA open-data endpoint takes dates in the Republic of China
//! calendar: a zero-padded three-digit year (Gregorian year minus 1911)
//! followed by `MMDD`, e.g. 2009-01-05 becomes `0980105`.

use chrono::{Datelike, NaiveDate};

/// Formats a date as the endpoint's ROC query form.
pub fn roc_query_date(date: NaiveDate) -> String {
    let roc_year = date.year() - 1911;
    format!("{:03}{:02}{:02}", roc_year, date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn pads_the_roc_year_to_three_digits() {
        assert_eq!(roc_query_date(date(2009, 1, 1)), "0980101");
        assert_eq!(roc_query_date(date(1912, 1, 1)), "0010101");
    }

    #[test]
    fn pads_month_and_day() {
        assert_eq!(roc_query_date(date(2018, 1, 9)), "1070109");
        assert_eq!(roc_query_date(date(2020, 12, 31)), "1091231");
    }
}
