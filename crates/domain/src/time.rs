//! Time and timestamp helpers.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// UTC timestamp used for `fetched_at`, event times, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Whether `ts` lies more than `max_age` before `reference`.
///
/// An age too large for chrono to represent never counts as expired.
#[must_use]
pub fn is_older_than(ts: Timestamp, max_age: Duration, reference: Timestamp) -> bool {
    match chrono::Duration::from_std(max_age) {
        Ok(max_age) => reference.signed_duration_since(ts) > max_age,
        Err(_) => false,
    }
}
