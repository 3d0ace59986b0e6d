//! Civil-calendar clock for the library's region (UTC+05:30).
//!
//! Every overdue and renewal decision in this crate compares *civil dates*,
//! never raw instants. A loan due "today" stays on time until the civil day
//! rolls over, regardless of time-of-day, and the day count across month,
//! year and leap-year boundaries comes from calendar arithmetic rather than
//! millisecond division.
//!
//! Nothing in this module reads the system clock. The reference instant is
//! always supplied by the caller, which is what keeps the whole fine
//! computation reproducible from `(due_at, as_of)` alone.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};

/// Regional offset in seconds east of UTC (+05:30). The only place in the
/// crate where the offset appears.
const CIVIL_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// The fixed civil offset of the library's region.
pub fn civil_offset() -> FixedOffset {
    // Statically in range, cannot fail.
    FixedOffset::east_opt(CIVIL_OFFSET_SECS).unwrap()
}

/// Projects an absolute instant onto the civil calendar.
///
/// Two instants fall on "the same civil day" iff this projection is equal.
pub fn civil_date_of(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&civil_offset()).date_naive()
}

/// Whole civil days `a - b`. Negative when `a` is earlier.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    a.signed_duration_since(b).num_days()
}

/// The last instant of a civil day: 23:59:59.999 in the regional offset,
/// expressed back as an absolute instant.
///
/// Every stored `due_at` is pinned through this function, so the overdue
/// boundary is always the civil midnight that follows it.
pub fn end_of_civil_day(date: NaiveDate) -> DateTime<Utc> {
    // 23:59:59.999 is valid on every calendar day, and a fixed offset has
    // no gaps or folds, so both unwraps are statically fine.
    let local = date.and_hms_milli_opt(23, 59, 59, 999).unwrap();
    local
        .and_local_timezone(civil_offset())
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

/// Due instant `days` whole civil days after `start`'s civil date, pinned to
/// end of civil day. Used for initial issue due dates and renewal extensions.
pub fn due_after(start: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    let date = civil_date_of(start) + Days::new(u64::from(days));
    end_of_civil_day(date)
}
