//! SQLite implementation of the fine repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::domain::entities::{FineRecord, FineStatus, NewFine};
use crate::domain::repositories::FineRepository;
use crate::error::AppError;

use super::timefmt::{parse_instant, store_instant};

/// SQLite repository for fine records.
pub struct SqliteFineRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteFineRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

fn row_to_fine(row: &SqliteRow) -> Result<FineRecord, AppError> {
    let status: String = row.try_get("status")?;
    let created_at: String = row.try_get("created_at")?;
    let settled_at: Option<String> = row.try_get("settled_at")?;

    Ok(FineRecord {
        id: row.try_get("id")?,
        loan_id: row.try_get("loan_id")?,
        amount: row.try_get("amount")?,
        status: FineStatus::parse(&status)?,
        remark: row.try_get("remark")?,
        created_at: parse_instant(&created_at)?,
        settled_at: settled_at.as_deref().map(parse_instant).transpose()?,
    })
}

#[async_trait]
impl FineRepository for SqliteFineRepository {
    async fn create(&self, new_fine: NewFine) -> Result<FineRecord, AppError> {
        new_fine.validate()?;

        let row = sqlx::query(
            r#"
            INSERT INTO fines (loan_id, amount, status, remark, created_at)
            VALUES (?1, ?2, 'Unpaid', ?3, ?4)
            RETURNING id, loan_id, amount, status, remark, created_at, settled_at
            "#,
        )
        .bind(new_fine.loan_id)
        .bind(new_fine.amount)
        .bind(&new_fine.remark)
        .bind(store_instant(new_fine.created_at))
        .fetch_one(self.pool.as_ref())
        .await?;

        row_to_fine(&row)
    }

    async fn find(&self, id: i64) -> Result<Option<FineRecord>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, loan_id, amount, status, remark, created_at, settled_at
            FROM fines
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.as_ref().map(row_to_fine).transpose()
    }

    async fn settle(
        &self,
        id: i64,
        status: FineStatus,
        settled_at: DateTime<Utc>,
    ) -> Result<FineRecord, AppError> {
        if !status.is_terminal() {
            return Err(AppError::invalid_input(
                "a fine can only be settled as Paid or Waived",
            ));
        }

        // Guarded on Unpaid so a settled fine stays terminal.
        let row = sqlx::query(
            r#"
            UPDATE fines
            SET status = ?1, settled_at = ?2
            WHERE id = ?3 AND status = 'Unpaid'
            RETURNING id, loan_id, amount, status, remark, created_at, settled_at
            "#,
        )
        .bind(status.as_str())
        .bind(store_instant(settled_at))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some(row) => row_to_fine(&row),
            None => match self.find(id).await? {
                Some(existing) => Err(AppError::conflict(format!(
                    "fine {id} is already {}",
                    existing.status.as_str()
                ))),
                None => Err(AppError::not_found(format!("fine {id} not found"))),
            },
        }
    }
}
