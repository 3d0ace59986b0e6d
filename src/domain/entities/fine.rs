//! Fine records produced by overdue returns and ad hoc charges.

use chrono::{DateTime, Utc};

use crate::error::AppError;

/// Settlement state of a fine. `Paid` and `Waived` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FineStatus {
    Unpaid,
    Paid,
    Waived,
}

impl FineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
            Self::Waived => "Waived",
        }
    }

    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "Unpaid" => Ok(Self::Unpaid),
            "Paid" => Ok(Self::Paid),
            "Waived" => Ok(Self::Waived),
            other => Err(AppError::internal(format!("unknown fine status '{other}'"))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Unpaid)
    }
}

/// A monetary fine owned by the loan that produced it but independently
/// payable. The loan id is kept for reporting, never for control flow.
#[derive(Debug, Clone)]
pub struct FineRecord {
    pub id: i64,
    pub loan_id: i64,
    pub amount: f64,
    pub status: FineStatus,
    pub remark: String,
    pub created_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

/// Input data for recording a fine.
#[derive(Debug, Clone)]
pub struct NewFine {
    pub loan_id: i64,
    pub amount: f64,
    pub remark: String,
    pub created_at: DateTime<Utc>,
}

impl NewFine {
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] on a negative or non-finite amount.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(AppError::invalid_input(format!(
                "fine amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [FineStatus::Unpaid, FineStatus::Paid, FineStatus::Waived] {
            assert_eq!(FineStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(FineStatus::parse("Forgiven").is_err());
    }

    #[test]
    fn only_unpaid_is_open() {
        assert!(!FineStatus::Unpaid.is_terminal());
        assert!(FineStatus::Paid.is_terminal());
        assert!(FineStatus::Waived.is_terminal());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let fine = NewFine {
            loan_id: 1,
            amount: -1.0,
            remark: String::new(),
            created_at: Utc.with_ymd_and_hms(2026, 2, 13, 9, 0, 0).unwrap(),
        };
        assert!(fine.validate().is_err());
    }
}
