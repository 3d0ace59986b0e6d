//! Loan lifecycle orchestration: Issue -> (Renew)* -> Return.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::CirculationPolicy;
use crate::domain::civil::due_after;
use crate::domain::entities::{FineRecord, Loan, LoanStatus, NewFine, NewLoan};
use crate::domain::overdue::{self, OverdueAssessment};
use crate::domain::renewal;
use crate::domain::repositories::{FineRepository, LoanRepository};
use crate::error::AppError;

/// An additive charge for the item's condition at return time (damage,
/// loss). The amounts are policy inputs decided by the operator, not
/// computed here.
#[derive(Debug, Clone)]
pub struct ConditionFine {
    pub amount: f64,
    pub remark: String,
}

/// Service driving loan state transitions.
///
/// Transitions are serialized per loan id through the repository's guarded
/// update: both `Renew` and `Return` write back against the state they read,
/// and a concurrent transition surfaces as [`AppError::Conflict`] instead of
/// a lost update.
///
/// Every operation takes the reference instant as a parameter; nothing here
/// reads the system clock.
pub struct CirculationService<L: LoanRepository, F: FineRepository> {
    loan_repository: Arc<L>,
    fine_repository: Arc<F>,
    policy: CirculationPolicy,
}

impl<L: LoanRepository, F: FineRepository> CirculationService<L, F> {
    /// Creates a new circulation service.
    pub fn new(loan_repository: Arc<L>, fine_repository: Arc<F>, policy: CirculationPolicy) -> Self {
        Self {
            loan_repository,
            fine_repository,
            policy,
        }
    }

    /// Issues a copy to a student.
    ///
    /// The due instant is the end of the civil day `loan_period_days` after
    /// the issue instant's civil date. Whether the copy *may* be issued
    /// (availability, borrower eligibility) is the caller's concern.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on storage errors.
    pub async fn issue_loan(
        &self,
        student_id: i64,
        copy_id: i64,
        issued_at: DateTime<Utc>,
    ) -> Result<Loan, AppError> {
        let new_loan = NewLoan {
            student_id,
            copy_id,
            issued_at,
            due_at: due_after(issued_at, self.policy.loan_period_days),
        };
        new_loan.validate()?;

        let loan = self.loan_repository.create(new_loan).await?;
        tracing::info!(
            loan_id = loan.id,
            student_id,
            copy_id,
            due_at = %loan.due_at,
            "loan issued"
        );
        Ok(loan)
    }

    /// Classifies a loan against a reference instant under the configured
    /// fine rate.
    pub fn evaluate_loan(&self, loan: &Loan, as_of: DateTime<Utc>) -> OverdueAssessment {
        overdue::assess(loan.due_at, as_of, self.policy.fine_rate_per_day)
    }

    /// Renews a loan, extending the due date from its *current* value.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - no such loan
    /// - [`AppError::AlreadyReturned`] - the loan is terminal
    /// - [`AppError::RenewalLimitExceeded`] - `renewal_count` is at the
    ///   configured maximum; reported, never retried
    /// - [`AppError::Conflict`] - a concurrent transition won the race
    pub async fn renew_loan(&self, loan_id: i64) -> Result<Loan, AppError> {
        let loan = self.require_loan(loan_id).await?;

        if loan.is_returned() {
            return Err(AppError::AlreadyReturned { loan_id });
        }

        if i64::from(loan.renewal_count) >= i64::from(self.policy.max_renewals) {
            return Err(AppError::RenewalLimitExceeded {
                loan_id,
                max_renewals: self.policy.max_renewals,
            });
        }

        let mut renewed = loan.clone();
        renewed.due_at = renewal::extend(loan.due_at, self.policy.renewal_extension_days)?;
        renewed.renewal_count += 1;

        self.loan_repository.update(&renewed, loan.renewal_count).await?;
        tracing::info!(
            loan_id,
            renewal_count = renewed.renewal_count,
            due_at = %renewed.due_at,
            "loan renewed"
        );
        Ok(renewed)
    }

    /// Returns a loan, assessing the overdue fine against `as_of`.
    ///
    /// Creates one `Unpaid` fine iff the return is at least one whole civil
    /// day late. See [`Self::return_loan_with_condition`] for additive
    /// damage/loss charges.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - no such loan
    /// - [`AppError::AlreadyReturned`] - a second return attempt; surfaced,
    ///   never silently ignored
    /// - [`AppError::Conflict`] - a concurrent transition won the race
    pub async fn return_loan(
        &self,
        loan_id: i64,
        as_of: DateTime<Utc>,
    ) -> Result<(Loan, Option<FineRecord>), AppError> {
        let (loan, fines) = self.return_loan_with_condition(loan_id, as_of, None).await?;
        Ok((loan, fines.into_iter().next()))
    }

    /// Returns a loan with an optional additive condition fine.
    ///
    /// The overdue fine (if any) comes first in the returned vector, the
    /// condition fine second.
    ///
    /// # Errors
    ///
    /// Same as [`Self::return_loan`], plus [`AppError::InvalidInput`] for a
    /// negative condition amount, rejected before the loan is touched.
    pub async fn return_loan_with_condition(
        &self,
        loan_id: i64,
        as_of: DateTime<Utc>,
        condition: Option<ConditionFine>,
    ) -> Result<(Loan, Vec<FineRecord>), AppError> {
        let loan = self.require_loan(loan_id).await?;

        if loan.is_returned() {
            return Err(AppError::AlreadyReturned { loan_id });
        }

        let assessment = self.evaluate_loan(&loan, as_of);

        // Both fines are built and validated before anything is written, so
        // a rejected input leaves the loan untouched and retryable.
        let overdue_fine = (assessment.overdue_days > 0).then(|| NewFine {
            loan_id,
            amount: assessment.fine,
            remark: format!("Overdue {} days", assessment.overdue_days),
            created_at: as_of,
        });
        let condition_fine = condition.map(|condition| NewFine {
            loan_id,
            amount: condition.amount,
            remark: condition.remark,
            created_at: as_of,
        });
        for new_fine in overdue_fine.iter().chain(condition_fine.iter()) {
            new_fine.validate()?;
        }

        let mut returned = loan.clone();
        returned.status = LoanStatus::Returned;
        returned.returned_at = Some(as_of);

        // The status flip is committed before any fine is written: if a
        // concurrent return wins the guarded update, this invocation stops
        // with Conflict and cannot double-charge.
        self.loan_repository.update(&returned, loan.renewal_count).await?;

        let mut fines = Vec::new();
        for new_fine in overdue_fine.into_iter().chain(condition_fine) {
            fines.push(self.fine_repository.create(new_fine).await?);
        }

        tracing::info!(
            loan_id,
            overdue_days = assessment.overdue_days,
            fine = assessment.fine,
            "loan returned"
        );
        Ok((returned, fines))
    }

    async fn require_loan(&self, loan_id: i64) -> Result<Loan, AppError> {
        self.loan_repository
            .find(loan_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("loan {loan_id} not found")))
    }
}
