use chrono::{DateTime, Utc};

pub fn iso_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.date_naive().format("%Y-%m-%d").to_string()
}

/// Whole days from `start` to `end`, truncated toward zero.
pub fn days_between(start: &DateTime<Utc>, end: &DateTime<Utc>) -> i64 {
    (*end - *start).num_days()
}
