//! SQLite implementation of the loan repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::domain::entities::{Loan, LoanStatus, NewLoan};
use crate::domain::repositories::LoanRepository;
use crate::error::AppError;

use super::timefmt::{parse_instant, store_instant};

/// SQLite repository for loan records.
pub struct SqliteLoanRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteLoanRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

fn row_to_loan(row: &SqliteRow) -> Result<Loan, AppError> {
    let issued_at: String = row.try_get("issued_at")?;
    let due_at: String = row.try_get("due_at")?;
    let status: String = row.try_get("status")?;
    let returned_at: Option<String> = row.try_get("returned_at")?;

    Ok(Loan {
        id: row.try_get("id")?,
        student_id: row.try_get("student_id")?,
        copy_id: row.try_get("copy_id")?,
        issued_at: parse_instant(&issued_at)?,
        due_at: parse_instant(&due_at)?,
        renewal_count: row.try_get("renewal_count")?,
        status: LoanStatus::parse(&status)?,
        returned_at: returned_at.as_deref().map(parse_instant).transpose()?,
    })
}

#[async_trait]
impl LoanRepository for SqliteLoanRepository {
    async fn create(&self, new_loan: NewLoan) -> Result<Loan, AppError> {
        let row = sqlx::query(
            r#"
            INSERT INTO loans (student_id, copy_id, issued_at, due_at, renewal_count, status)
            VALUES (?1, ?2, ?3, ?4, 0, 'Active')
            RETURNING id, student_id, copy_id, issued_at, due_at, renewal_count, status, returned_at
            "#,
        )
        .bind(new_loan.student_id)
        .bind(new_loan.copy_id)
        .bind(store_instant(new_loan.issued_at))
        .bind(store_instant(new_loan.due_at))
        .fetch_one(self.pool.as_ref())
        .await?;

        row_to_loan(&row)
    }

    async fn find(&self, id: i64) -> Result<Option<Loan>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, student_id, copy_id, issued_at, due_at, renewal_count, status, returned_at
            FROM loans
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.as_ref().map(row_to_loan).transpose()
    }

    async fn list_active_due_before(&self, as_of: DateTime<Utc>) -> Result<Vec<Loan>, AppError> {
        // The stored timestamp format makes the TEXT comparison
        // chronological. Civil-date classification stays with the caller.
        let rows = sqlx::query(
            r#"
            SELECT id, student_id, copy_id, issued_at, due_at, renewal_count, status, returned_at
            FROM loans
            WHERE status = 'Active' AND due_at < ?1
            ORDER BY due_at, id
            "#,
        )
        .bind(store_instant(as_of))
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.iter().map(row_to_loan).collect()
    }

    async fn update(&self, loan: &Loan, expected_renewal_count: i32) -> Result<(), AppError> {
        // Guarded write: only applies while the row is still the Active
        // version the caller read. Zero rows affected means a concurrent
        // transition won.
        let result = sqlx::query(
            r#"
            UPDATE loans
            SET due_at = ?1, renewal_count = ?2, status = ?3, returned_at = ?4
            WHERE id = ?5 AND status = 'Active' AND renewal_count = ?6
            "#,
        )
        .bind(store_instant(loan.due_at))
        .bind(loan.renewal_count)
        .bind(loan.status.as_str())
        .bind(loan.returned_at.map(store_instant))
        .bind(loan.id)
        .bind(expected_renewal_count)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "loan {} was modified concurrently",
                loan.id
            )));
        }

        Ok(())
    }
}
