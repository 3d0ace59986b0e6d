//! Daily overdue-notice scan.
//!
//! Triggered once at process start and then on a fixed daily schedule, both
//! treated identically. The job guarantees *at most one* notice per student
//! per civil day: the marker is advanced before any dispatch is attempted,
//! so a delivery failure can never cause a re-notification storm on the next
//! trigger the same day.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::CirculationPolicy;
use crate::domain::civil::civil_date_of;
use crate::domain::notification::{AuditEvent, AuditSink, OverdueItem, OverdueNotifier};
use crate::domain::overdue;
use crate::domain::repositories::{LoanRepository, NoticeMarkerRepository, StudentRepository};
use crate::error::AppError;

/// Outcome of one job invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeSummary {
    pub civil_date: NaiveDate,
    /// True when the day was already handled (marker match or a lost
    /// compare-and-set race) and nothing was scanned.
    pub skipped: bool,
    /// Active loans the calculator classified as overdue.
    pub overdue_loans: usize,
    pub students_notified: usize,
    pub dispatch_failures: usize,
}

impl NoticeSummary {
    fn skipped(civil_date: NaiveDate) -> Self {
        Self {
            civil_date,
            skipped: true,
            overdue_loans: 0,
            students_notified: 0,
            dispatch_failures: 0,
        }
    }
}

/// The once-per-civil-day overdue scan-and-notify job.
pub struct OverdueNoticeJob<L, M, S, N, A>
where
    L: LoanRepository,
    M: NoticeMarkerRepository,
    S: StudentRepository,
    N: OverdueNotifier,
    A: AuditSink,
{
    loan_repository: Arc<L>,
    marker_repository: Arc<M>,
    student_repository: Arc<S>,
    notifier: Arc<N>,
    audit: Arc<A>,
    policy: CirculationPolicy,
}

impl<L, M, S, N, A> OverdueNoticeJob<L, M, S, N, A>
where
    L: LoanRepository,
    M: NoticeMarkerRepository,
    S: StudentRepository,
    N: OverdueNotifier,
    A: AuditSink,
{
    /// Creates a new notice job.
    pub fn new(
        loan_repository: Arc<L>,
        marker_repository: Arc<M>,
        student_repository: Arc<S>,
        notifier: Arc<N>,
        audit: Arc<A>,
        policy: CirculationPolicy,
    ) -> Self {
        Self {
            loan_repository,
            marker_repository,
            student_repository,
            notifier,
            audit,
            policy,
        }
    }

    /// Runs one scan against the supplied reference instant.
    ///
    /// Invoking this twice with reference instants on the same civil date
    /// dispatches notices at most once; the second call is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] when the marker or loan store fails.
    /// Individual dispatch failures are counted in the summary, not errors.
    pub async fn run(&self, as_of: DateTime<Utc>) -> Result<NoticeSummary, AppError> {
        let today = civil_date_of(as_of);

        let marker = self.marker_repository.load().await?;
        if marker.already_sent_on(today) {
            tracing::info!(%today, "overdue notices already sent today, skipping");
            return Ok(NoticeSummary::skipped(today));
        }

        let candidates = self.loan_repository.list_active_due_before(as_of).await?;

        // Group overdue loans by student, re-classifying each through the
        // civil-date calculator. BTreeMap keeps dispatch order stable.
        let mut by_student: BTreeMap<i64, Vec<OverdueItem>> = BTreeMap::new();
        let mut overdue_loans = 0;
        for loan in &candidates {
            let assessment = overdue::assess(loan.due_at, as_of, self.policy.fine_rate_per_day);
            if !assessment.is_overdue {
                continue;
            }
            overdue_loans += 1;
            by_student.entry(loan.student_id).or_default().push(OverdueItem {
                loan_id: loan.id,
                copy_id: loan.copy_id,
                due_at: loan.due_at,
                overdue_days: assessment.overdue_days,
            });
        }

        // Claim the day before attempting any dispatch, whether or not
        // anything is overdue. Losing the compare-and-set means a concurrent
        // trigger already owns today; that invocation exits as handled.
        if !self
            .marker_repository
            .mark_sent(today, marker.last_sent)
            .await?
        {
            tracing::info!(%today, "another invocation claimed today's scan, skipping");
            return Ok(NoticeSummary::skipped(today));
        }

        if by_student.is_empty() {
            tracing::info!(%today, "no overdue loans found today");
            return Ok(NoticeSummary {
                civil_date: today,
                skipped: false,
                overdue_loans: 0,
                students_notified: 0,
                dispatch_failures: 0,
            });
        }

        tracing::info!(
            %today,
            students = by_student.len(),
            loans = overdue_loans,
            "dispatching overdue notices"
        );

        let mut students_notified = 0;
        let mut dispatch_failures = 0;

        for (student_id, items) in &by_student {
            let student = match self.student_repository.find(*student_id).await? {
                Some(student) => student,
                None => {
                    tracing::warn!(student_id, "overdue loans reference an unknown student");
                    continue;
                }
            };

            if !student.has_contact_address() {
                tracing::debug!(student_id, "student has no contact address, skipping notice");
                continue;
            }

            if self.notifier.send_overdue_notice(&student, items).await {
                students_notified += 1;
            } else {
                dispatch_failures += 1;
                tracing::warn!(
                    student_id,
                    items = items.len(),
                    "overdue notice dispatch failed"
                );
            }
        }

        if students_notified > 0 {
            // The day is already claimed; a failed audit write is logged
            // rather than failing the run.
            if let Err(e) = self
                .audit
                .record(AuditEvent::overdue_scan(students_notified))
                .await
            {
                tracing::warn!(error = %e, "failed to record overdue-scan audit entry");
            }
        }

        Ok(NoticeSummary {
            civil_date: today,
            skipped: false,
            overdue_loans,
            students_notified,
            dispatch_failures,
        })
    }
}
