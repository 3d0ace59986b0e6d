//! End-to-end overdue-notice scan against a real SQLite database, with an
//! in-memory recording notifier standing in for the mail transport. Every
//! reference instant is fixed; nothing depends on the wall clock.

mod common;

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::{Arc, Mutex};

use circulation_desk::application::services::OverdueNoticeJob;
use circulation_desk::config::CirculationPolicy;
use circulation_desk::domain::entities::Student;
use circulation_desk::domain::notification::{AuditEvent, AuditSink, OverdueItem, OverdueNotifier};
use circulation_desk::error::AppError;
use circulation_desk::infrastructure::persistence::{
    SqliteLoanRepository, SqliteMarkerRepository, SqliteStudentRepository,
};

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(i64, Vec<OverdueItem>)>>,
    fail_for: Option<i64>,
}

#[async_trait]
impl OverdueNotifier for RecordingNotifier {
    async fn send_overdue_notice(&self, student: &Student, items: &[OverdueItem]) -> bool {
        if self.fail_for == Some(student.id) {
            return false;
        }
        self.sent.lock().unwrap().push((student.id, items.to_vec()));
        true
    }
}

#[derive(Default)]
struct RecordingAudit {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditSink for RecordingAudit {
    async fn record(&self, event: AuditEvent) -> Result<(), AppError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

fn policy() -> CirculationPolicy {
    CirculationPolicy {
        fine_rate_per_day: 1.0,
        loan_period_days: 14,
        renewal_extension_days: 15,
        max_renewals: 2,
    }
}

fn job(
    pool: SqlitePool,
    notifier: Arc<RecordingNotifier>,
    audit: Arc<RecordingAudit>,
) -> OverdueNoticeJob<
    SqliteLoanRepository,
    SqliteMarkerRepository,
    SqliteStudentRepository,
    RecordingNotifier,
    RecordingAudit,
> {
    let pool = Arc::new(pool);
    OverdueNoticeJob::new(
        Arc::new(SqliteLoanRepository::new(pool.clone())),
        Arc::new(SqliteMarkerRepository::new(pool.clone())),
        Arc::new(SqliteStudentRepository::new(pool)),
        notifier,
        audit,
        policy(),
    )
}

#[sqlx::test]
async fn test_scan_groups_per_student_and_is_idempotent(pool: SqlitePool) {
    let alice = common::create_student(&pool, "Alice", Some("alice@example.edu")).await;
    let bob = common::create_student(&pool, "Bob", Some("bob@example.edu")).await;

    // Alice: due Feb 12 and Feb 6; Bob: due Feb 10 plus one due today
    // (Feb 13), which must not be notified.
    common::insert_active_loan(&pool, alice, 1, common::at(2026, 1, 29, 10, 0), common::due(2026, 2, 12)).await;
    common::insert_active_loan(&pool, alice, 2, common::at(2026, 1, 23, 10, 0), common::due(2026, 2, 6)).await;
    common::insert_active_loan(&pool, bob, 3, common::at(2026, 1, 27, 10, 0), common::due(2026, 2, 10)).await;
    common::insert_active_loan(&pool, bob, 4, common::at(2026, 1, 30, 10, 0), common::due(2026, 2, 13)).await;

    let notifier = Arc::new(RecordingNotifier::default());
    let audit = Arc::new(RecordingAudit::default());
    let job = job(pool, notifier.clone(), audit.clone());

    let summary = job.run(common::at(2026, 2, 13, 8, 0)).await.unwrap();

    assert!(!summary.skipped);
    assert_eq!(summary.overdue_loans, 3);
    assert_eq!(summary.students_notified, 2);
    assert_eq!(summary.dispatch_failures, 0);

    {
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        let (_, alice_items) = sent.iter().find(|(id, _)| *id == alice).unwrap();
        assert_eq!(alice_items.len(), 2);
        assert_eq!(alice_items[0].overdue_days, 7); // due Feb 6, listed first
        assert_eq!(alice_items[1].overdue_days, 1);
        let (_, bob_items) = sent.iter().find(|(id, _)| *id == bob).unwrap();
        assert_eq!(bob_items.len(), 1);
        assert_eq!(bob_items[0].overdue_days, 3);
    }

    assert_eq!(audit.events.lock().unwrap().len(), 1);

    // Retrigger later the same civil day: a no-op.
    let second = job.run(common::at(2026, 2, 13, 17, 30)).await.unwrap();
    assert!(second.skipped);
    assert_eq!(notifier.sent.lock().unwrap().len(), 2);
    assert_eq!(audit.events.lock().unwrap().len(), 1);

    // The next civil day runs again.
    let next_day = job.run(common::at(2026, 2, 14, 8, 0)).await.unwrap();
    assert!(!next_day.skipped);
    assert_eq!(next_day.students_notified, 2);
}

#[sqlx::test]
async fn test_dispatch_failure_still_claims_the_day(pool: SqlitePool) {
    let alice = common::create_student(&pool, "Alice", Some("alice@example.edu")).await;
    let bob = common::create_student(&pool, "Bob", Some("bob@example.edu")).await;
    common::insert_active_loan(&pool, alice, 1, common::at(2026, 1, 29, 10, 0), common::due(2026, 2, 12)).await;
    common::insert_active_loan(&pool, bob, 2, common::at(2026, 1, 27, 10, 0), common::due(2026, 2, 12)).await;

    let notifier = Arc::new(RecordingNotifier {
        sent: Mutex::new(Vec::new()),
        fail_for: Some(alice),
    });
    let audit = Arc::new(RecordingAudit::default());
    let job = job(pool, notifier.clone(), audit.clone());

    let summary = job.run(common::at(2026, 2, 13, 8, 0)).await.unwrap();
    assert_eq!(summary.students_notified, 1);
    assert_eq!(summary.dispatch_failures, 1);

    // At-most-once per day: the failed student is NOT retried on a
    // same-day retrigger; the day is already claimed.
    let retry = job.run(common::at(2026, 2, 13, 9, 0)).await.unwrap();
    assert!(retry.skipped);
    assert_eq!(notifier.sent.lock().unwrap().len(), 1);
}

#[sqlx::test]
async fn test_students_without_email_are_skipped(pool: SqlitePool) {
    let ghost = common::create_student(&pool, "No Contact", None).await;
    common::insert_active_loan(&pool, ghost, 1, common::at(2026, 1, 29, 10, 0), common::due(2026, 2, 12)).await;

    let notifier = Arc::new(RecordingNotifier::default());
    let audit = Arc::new(RecordingAudit::default());
    let job = job(pool, notifier.clone(), audit.clone());

    let summary = job.run(common::at(2026, 2, 13, 8, 0)).await.unwrap();

    assert!(!summary.skipped);
    assert_eq!(summary.overdue_loans, 1);
    assert_eq!(summary.students_notified, 0);
    assert!(notifier.sent.lock().unwrap().is_empty());
    assert!(audit.events.lock().unwrap().is_empty());
}
