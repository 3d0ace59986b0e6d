//! SQLite audit log sink.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::notification::{AuditEvent, AuditSink};
use crate::error::AppError;

use super::timefmt::store_instant;

/// Writes system-actor audit entries into `audit_logs`.
pub struct SqliteAuditSink {
    pool: Arc<SqlitePool>,
}

impl SqliteAuditSink {
    /// Creates a new sink with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for SqliteAuditSink {
    async fn record(&self, event: AuditEvent) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (module, action, description, actor, created_at)
            VALUES (?1, ?2, ?3, 'SYSTEM', ?4)
            "#,
        )
        .bind(&event.module)
        .bind(&event.action)
        .bind(&event.description)
        .bind(store_instant(Utc::now()))
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
