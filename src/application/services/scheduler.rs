//! Daily trigger for the overdue-notice job.
//!
//! The scheduler is the only place that reads the wall clock. It runs the
//! job once at startup and then at the configured civil-time hour each day;
//! the job's own idempotency marker makes the startup run safe even when the
//! process restarts several times in one day.

use chrono::{DateTime, Days, NaiveTime, Utc};
use std::time::Duration;

use crate::domain::civil::civil_offset;
use crate::domain::notification::{AuditSink, OverdueNotifier};
use crate::domain::repositories::{LoanRepository, NoticeMarkerRepository, StudentRepository};

use super::overdue_notice_job::OverdueNoticeJob;

/// The next instant strictly after `now` at which the civil wall clock
/// reads `hour:00:00`.
pub fn next_trigger_after(now: DateTime<Utc>, hour: u32) -> DateTime<Utc> {
    let offset = civil_offset();
    let local = now.with_timezone(&offset);
    // NOTICE_HOUR is validated to 0..=23 at startup.
    let trigger_time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap();

    let mut date = local.date_naive();
    if local.time() >= trigger_time {
        date = date + Days::new(1);
    }

    // Fixed offsets have no gaps or folds.
    date.and_time(trigger_time)
        .and_local_timezone(offset)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

/// Runs the notice job now and then daily at `hour` civil time, forever.
///
/// Job failures are logged and the schedule keeps going; a failed day is
/// retried at the next trigger like any other.
pub async fn run_daily<L, M, S, N, A>(
    job: OverdueNoticeJob<L, M, S, N, A>,
    hour: u32,
) where
    L: LoanRepository,
    M: NoticeMarkerRepository,
    S: StudentRepository,
    N: OverdueNotifier,
    A: AuditSink,
{
    loop {
        let now = Utc::now();
        match job.run(now).await {
            Ok(summary) if summary.skipped => {
                tracing::debug!(date = %summary.civil_date, "overdue scan skipped")
            }
            Ok(summary) => tracing::info!(
                date = %summary.civil_date,
                overdue_loans = summary.overdue_loans,
                students_notified = summary.students_notified,
                dispatch_failures = summary.dispatch_failures,
                "overdue scan completed"
            ),
            Err(e) => tracing::error!(error = %e, "overdue scan failed"),
        }

        let next = next_trigger_after(Utc::now(), hour);
        let wait = (next - Utc::now())
            .to_std()
            .unwrap_or(Duration::from_secs(1));
        tracing::debug!(next = %next, "sleeping until next overdue scan");
        tokio::time::sleep(wait).await;
    }
}
