//! SQLite implementation of the notice-marker store.
//!
//! The marker lives in the `system_settings` key/value table as a bare
//! civil date. `mark_sent` is a compare-and-set against the previously read
//! value, which is the mutual-exclusion point between overlapping job
//! triggers (manual + scheduled, or two processes).

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::domain::entities::OverdueNoticeMarker;
use crate::domain::repositories::NoticeMarkerRepository;
use crate::error::AppError;

const MARKER_KEY: &str = "last_overdue_notice_sent";

/// SQLite-backed singleton notice marker.
pub struct SqliteMarkerRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteMarkerRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoticeMarkerRepository for SqliteMarkerRepository {
    async fn load(&self) -> Result<OverdueNoticeMarker, AppError> {
        let row = sqlx::query("SELECT value FROM system_settings WHERE key = ?1")
            .bind(MARKER_KEY)
            .fetch_optional(self.pool.as_ref())
            .await?;

        let last_sent = match row {
            Some(row) => {
                let value: String = row.try_get("value")?;
                Some(value.parse::<NaiveDate>().map_err(|e| {
                    AppError::internal(format!("malformed notice marker '{value}': {e}"))
                })?)
            }
            None => None,
        };

        Ok(OverdueNoticeMarker { last_sent })
    }

    async fn mark_sent(
        &self,
        today: NaiveDate,
        expected_previous: Option<NaiveDate>,
    ) -> Result<bool, AppError> {
        let result = match expected_previous {
            // First run ever: the insert itself is the race arbiter.
            None => {
                sqlx::query(
                    "INSERT INTO system_settings (key, value) VALUES (?1, ?2)
                     ON CONFLICT (key) DO NOTHING",
                )
                .bind(MARKER_KEY)
                .bind(today.to_string())
                .execute(self.pool.as_ref())
                .await?
            }
            Some(previous) => {
                sqlx::query("UPDATE system_settings SET value = ?1 WHERE key = ?2 AND value = ?3")
                    .bind(today.to_string())
                    .bind(MARKER_KEY)
                    .bind(previous.to_string())
                    .execute(self.pool.as_ref())
                    .await?
            }
        };

        Ok(result.rows_affected() == 1)
    }
}
