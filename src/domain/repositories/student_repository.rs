//! Repository trait for student lookup.

use crate::domain::entities::Student;
use crate::error::AppError;
use async_trait::async_trait;

/// Read-side interface for resolving the students behind overdue loans.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Finds a student by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on storage errors.
    async fn find(&self, id: i64) -> Result<Option<Student>, AppError>;
}
