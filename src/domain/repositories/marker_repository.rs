//! Repository trait for the daily notice marker.

use crate::domain::entities::OverdueNoticeMarker;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Storage for the singleton [`OverdueNoticeMarker`].
///
/// The marker is the mutual-exclusion point for the daily job: concurrent
/// invocations race on `mark_sent` and exactly one wins the day.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoticeMarkerRepository: Send + Sync {
    /// Reads the current marker.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on storage errors.
    async fn load(&self) -> Result<OverdueNoticeMarker, AppError>;

    /// Compare-and-set: advances the marker to `today` only if it still
    /// holds `expected_previous`.
    ///
    /// Returns `false` when the stored value changed underneath the caller,
    /// meaning a concurrent invocation already claimed the day. The loser
    /// treats that as "already handled today" and exits silently.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on storage errors.
    async fn mark_sent(
        &self,
        today: NaiveDate,
        expected_previous: Option<NaiveDate>,
    ) -> Result<bool, AppError>;
}
