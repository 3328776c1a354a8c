//! Timestamp utilities

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert milliseconds since the Unix epoch to a calendar date in the
/// local system time zone.
///
/// Returns `None` when the instant is outside chrono's representable range.
pub fn epoch_millis_to_local_date(millis: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|utc| utc.with_timezone(&Local).date_naive())
}
