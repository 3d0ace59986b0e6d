//! Daily overdue-notice marker.

use chrono::NaiveDate;

/// Singleton guard for the daily notice job: the civil date of the last run
/// that claimed the day. Read before the scan, compare-and-set updated, and
/// owned by the external settings store rather than any hidden static.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverdueNoticeMarker {
    pub last_sent: Option<NaiveDate>,
}

impl OverdueNoticeMarker {
    pub fn already_sent_on(&self, today: NaiveDate) -> bool {
        self.last_sent == Some(today)
    }
}
