//! Rolling query window for "recently modified" lookups

use chrono::{Duration, Local, NaiveDateTime};

use super::constants::QUERY_WINDOW_HOURS;

/// Start and end of the query window, already formatted for use in a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    /// Window ending now (local time) and reaching back [`QUERY_WINDOW_HOURS`]
    pub fn last_24_hours() -> Self {
        Self::ending_at(Local::now().naive_local())
    }

    pub fn ending_at(end: NaiveDateTime) -> Self {
        let start = end - Duration::hours(QUERY_WINDOW_HOURS);
        Self {
            start: format_date(&start),
            end: format_date(&end),
        }
    }
}

/// Format a timestamp as a percent-encoded, seconds-precision ISO string with a `Z` suffix
///
/// Fractional seconds are dropped, not rounded.
pub fn format_date(date: &NaiveDateTime) -> String {
    let iso = date.format("%Y-%m-%dT%H:%M:%S").to_string();
    format!("{}Z", urlencoding::encode(&iso))
}
