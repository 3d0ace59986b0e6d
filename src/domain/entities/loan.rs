//! Loan entity: one copy issued to one student.

use chrono::{DateTime, Utc};

use crate::error::AppError;

/// Lifecycle state of a loan. `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Active,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Returned => "Returned",
        }
    }

    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "Active" => Ok(Self::Active),
            "Returned" => Ok(Self::Returned),
            other => Err(AppError::internal(format!("unknown loan status '{other}'"))),
        }
    }
}

/// A lending loan.
///
/// `due_at` is always pinned to the last instant of a civil day, so the
/// overdue boundary is the civil midnight that follows it. Mutated by Renew
/// (`due_at`, `renewal_count`) and by Return (`status`, `returned_at`);
/// never mutated after Return.
#[derive(Debug, Clone)]
pub struct Loan {
    pub id: i64,
    pub student_id: i64,
    pub copy_id: i64,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub renewal_count: i32,
    pub status: LoanStatus,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    pub fn is_returned(&self) -> bool {
        self.status == LoanStatus::Returned
    }
}

/// Input data for issuing a loan.
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub student_id: i64,
    pub copy_id: i64,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

impl NewLoan {
    /// Validates field coherence before anything touches storage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] when `due_at` precedes `issued_at`.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.due_at < self.issued_at {
            return Err(AppError::invalid_input(
                "due date must not precede the issue date",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 12, h, 0, 0).unwrap()
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        assert_eq!(LoanStatus::parse("Active").unwrap(), LoanStatus::Active);
        assert_eq!(LoanStatus::parse("Returned").unwrap(), LoanStatus::Returned);
        assert!(LoanStatus::parse("Lost").is_err());
    }

    #[test]
    fn new_loan_rejects_due_before_issue() {
        let bad = NewLoan {
            student_id: 1,
            copy_id: 1,
            issued_at: instant(12),
            due_at: instant(10),
        };
        assert!(matches!(
            bad.validate().unwrap_err(),
            AppError::InvalidInput(_)
        ));
    }

    #[test]
    fn loan_state_predicates() {
        let loan = Loan {
            id: 1,
            student_id: 2,
            copy_id: 3,
            issued_at: instant(10),
            due_at: instant(12),
            renewal_count: 0,
            status: LoanStatus::Active,
            returned_at: None,
        };
        assert!(loan.is_active());
        assert!(!loan.is_returned());
    }
}
