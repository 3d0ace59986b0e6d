//! SQLite implementation of student lookup.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::domain::entities::Student;
use crate::domain::repositories::StudentRepository;
use crate::error::AppError;

/// SQLite repository for student records.
pub struct SqliteStudentRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteStudentRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentRepository for SqliteStudentRepository {
    async fn find(&self, id: i64) -> Result<Option<Student>, AppError> {
        let row = sqlx::query("SELECT id, full_name, email FROM students WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(|row| {
            Ok(Student {
                id: row.try_get("id")?,
                full_name: row.try_get("full_name")?,
                email: row.try_get("email")?,
            })
        })
        .transpose()
    }
}
