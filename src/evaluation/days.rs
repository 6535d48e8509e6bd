//! Whole-day arithmetic at UTC day granularity.

use chrono::{DateTime, Utc};

/// Counts calendar days between two instants, ignoring time of day.
///
/// Both instants are reduced to their UTC calendar date first, so
/// 23:59 on one day and 00:01 on the next are one day apart. The result is
/// negative when `to` falls on an earlier date than `from`.
///
/// # Example
///
/// ```
/// use expense_policy::evaluation::days_between;
/// use chrono::{TimeZone, Utc};
///
/// let late = Utc.with_ymd_and_hms(2025, 3, 1, 23, 59, 0).unwrap();
/// let early = Utc.with_ymd_and_hms(2025, 3, 2, 0, 1, 0).unwrap();
/// assert_eq!(days_between(late, early), 1);
/// assert_eq!(days_between(early, late), -1);
/// ```
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to.date_naive() - from.date_naive()).num_days()
}

/// Returns how many whole days old an expense is, clamping future dates to zero.
pub fn days_old(expense_date: DateTime<Utc>, as_of: DateTime<Utc>) -> i64 {
    days_between(expense_date, as_of).max(0)
}
