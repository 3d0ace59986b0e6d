#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sqlx::SqlitePool;

use circulation_desk::domain::civil::{civil_offset, end_of_civil_day};
use circulation_desk::infrastructure::persistence::timefmt::store_instant;

/// End-of-civil-day due instant for a fixed calendar date.
pub fn due(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
    end_of_civil_day(NaiveDate::from_ymd_opt(y, mo, d).unwrap())
}

/// A fixed instant given by its wall-clock reading in the civil offset.
pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    civil_offset()
        .with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
        .with_timezone(&Utc)
}

pub async fn create_student(pool: &SqlitePool, name: &str, email: Option<&str>) -> i64 {
    sqlx::query_scalar("INSERT INTO students (full_name, email) VALUES (?1, ?2) RETURNING id")
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn insert_active_loan(
    pool: &SqlitePool,
    student_id: i64,
    copy_id: i64,
    issued_at: DateTime<Utc>,
    due_at: DateTime<Utc>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO loans (student_id, copy_id, issued_at, due_at, renewal_count, status)
         VALUES (?1, ?2, ?3, ?4, 0, 'Active') RETURNING id",
    )
    .bind(student_id)
    .bind(copy_id)
    .bind(store_instant(issued_at))
    .bind(store_instant(due_at))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_returned_loan(
    pool: &SqlitePool,
    student_id: i64,
    copy_id: i64,
    issued_at: DateTime<Utc>,
    due_at: DateTime<Utc>,
    returned_at: DateTime<Utc>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO loans (student_id, copy_id, issued_at, due_at, renewal_count, status, returned_at)
         VALUES (?1, ?2, ?3, ?4, 0, 'Returned', ?5) RETURNING id",
    )
    .bind(student_id)
    .bind(copy_id)
    .bind(store_instant(issued_at))
    .bind(store_instant(due_at))
    .bind(store_instant(returned_at))
    .fetch_one(pool)
    .await
    .unwrap()
}
