//! Clock port and time tolerance helpers
//!
//! Services never call `Utc::now()` directly. They ask a [`ClockPort`] so
//! that tests can pin the current instant.

use chrono::{DateTime, Duration, Utc};

/// Source of the current instant
pub trait ClockPort: Send + Sync {
    /// Returns the current date and time in UTC
    fn current_date_time(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn current_date_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Returns true if `date` lies within `tolerance` of `now`, in either direction
///
/// # Arguments
///
/// * `date` - The timestamp being checked
/// * `now` - The reference instant, usually from a [`ClockPort`]
/// * `tolerance` - Maximum accepted skew; treated as an absolute value
pub fn is_within_tolerance(date: DateTime<Utc>, now: DateTime<Utc>, tolerance: Duration) -> bool {
    let difference = (now - date).abs();
    difference <= tolerance.abs()
}
