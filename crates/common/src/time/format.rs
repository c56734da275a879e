//! Epoch-millisecond conversions
//!
//! Trend analysis buckets events by calendar day in UTC, using the
//! `YYYY-MM-DD` key that sorts lexicographically in chronological order.

use chrono::{DateTime, Utc};

/// Convert epoch milliseconds to a UTC datetime
///
/// Out-of-range values collapse to the epoch rather than failing.
pub fn millis_to_utc(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// UTC calendar day of an epoch-millisecond timestamp, e.g. `"2024-03-01"`
///
/// ```
/// use vitalscope_common::time::utc_date_key;
///
/// assert_eq!(utc_date_key(0), "1970-01-01");
/// assert_eq!(utc_date_key(86_399_999), "1970-01-01");
/// assert_eq!(utc_date_key(86_400_000), "1970-01-02");
/// ```
pub fn utc_date_key(millis: i64) -> String {
    millis_to_utc(millis).format("%Y-%m-%d").to_string()
}
