//! Repository trait for loan data access.

use crate::domain::entities::{Loan, NewLoan};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for loan records.
///
/// The store must support per-record atomic read-modify-write: `Renew` and
/// `Return` on the same loan must never interleave, because a lost update
/// there means an incorrect or missing fine.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteLoanRepository`]
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Persists a newly issued loan and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on storage errors.
    async fn create(&self, new_loan: NewLoan) -> Result<Loan, AppError>;

    /// Finds a loan by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on storage errors.
    async fn find(&self, id: i64) -> Result<Option<Loan>, AppError>;

    /// Lists `Active` loans whose due instant precedes `as_of`.
    ///
    /// This is a coarse storage-level filter; the caller re-classifies each
    /// loan with the civil-date calculator before treating it as overdue.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on storage errors.
    async fn list_active_due_before(&self, as_of: DateTime<Utc>) -> Result<Vec<Loan>, AppError>;

    /// Writes back a mutated loan, guarded on the state the caller read.
    ///
    /// The update only applies while the stored row is still `Active` with
    /// `renewal_count == expected_renewal_count`; this is the single-writer
    /// discipline for lifecycle transitions.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when a concurrent transition won the
    /// race, [`AppError::Database`] on storage errors.
    async fn update(&self, loan: &Loan, expected_renewal_count: i32) -> Result<(), AppError>;
}
