//! Repository trait for fine records.

use crate::domain::entities::{FineRecord, FineStatus, NewFine};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for fines.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FineRepository: Send + Sync {
    /// Records a new `Unpaid` fine.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on storage errors.
    async fn create(&self, new_fine: NewFine) -> Result<FineRecord, AppError>;

    /// Finds a fine by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on storage errors.
    async fn find(&self, id: i64) -> Result<Option<FineRecord>, AppError>;

    /// Settles an `Unpaid` fine as `Paid` or `Waived`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] when `status` is `Unpaid`,
    /// [`AppError::Conflict`] when the fine is already settled,
    /// [`AppError::NotFound`] when no such fine exists.
    async fn settle(
        &self,
        id: i64,
        status: FineStatus,
        settled_at: DateTime<Utc>,
    ) -> Result<FineRecord, AppError>;
}
