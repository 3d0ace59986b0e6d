//! SQLite pool setup and schema migration.

use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::AppError;

/// Embedded migrations from `./migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Opens (creating if missing) the SQLite database and applies migrations.
///
/// # Errors
///
/// Returns [`AppError::Database`] when the URL is malformed or the
/// connection fails, [`AppError::Internal`] when migration fails.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|e| AppError::internal(format!("migration failed: {e}")))?;

    Ok(pool)
}
