//! Error taxonomy for circulation operations.
//!
//! Lifecycle violations (`AlreadyReturned`, `RenewalLimitExceeded`) are
//! surfaced to the caller and never retried. `Conflict` marks a lost
//! optimistic-update race on a loan record. Per-student notice dispatch
//! failures are not represented here at all: the notifier reports them as
//! `false` and the job counts them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input rejected at the call boundary, e.g. a zero-day
    /// renewal extension or a due date before the issue date.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A `Return` was attempted on a loan that is already terminal.
    /// Never ignored silently: a duplicate return would double-charge.
    #[error("loan {loan_id} has already been returned")]
    AlreadyReturned { loan_id: i64 },

    /// A `Renew` was attempted past the configured renewal limit.
    #[error("loan {loan_id} has reached the renewal limit of {max_renewals}")]
    RenewalLimitExceeded { loan_id: i64, max_renewals: u32 },

    #[error("{0}")]
    NotFound(String),

    /// The guarded read-modify-write of a record lost the race to a
    /// concurrent writer. The caller re-reads and decides; nothing was
    /// persisted by the loser.
    #[error("concurrent update conflict: {0}")]
    Conflict(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
