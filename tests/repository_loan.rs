mod common;

use sqlx::SqlitePool;
use std::sync::Arc;

use circulation_desk::domain::entities::{LoanStatus, NewLoan};
use circulation_desk::domain::repositories::LoanRepository;
use circulation_desk::error::AppError;
use circulation_desk::infrastructure::persistence::SqliteLoanRepository;

#[sqlx::test]
async fn test_create_loan(pool: SqlitePool) {
    let student_id = common::create_student(&pool, "Student A", None).await;
    let repo = SqliteLoanRepository::new(Arc::new(pool));

    let new_loan = NewLoan {
        student_id,
        copy_id: 11,
        issued_at: common::at(2026, 2, 13, 14, 30),
        due_at: common::due(2026, 2, 27),
    };

    let loan = repo.create(new_loan).await.unwrap();

    assert!(loan.id > 0);
    assert_eq!(loan.status, LoanStatus::Active);
    assert_eq!(loan.renewal_count, 0);
    assert_eq!(loan.issued_at, common::at(2026, 2, 13, 14, 30));
    assert_eq!(loan.due_at, common::due(2026, 2, 27));
    assert!(loan.returned_at.is_none());
}

#[sqlx::test]
async fn test_find_round_trips_instants(pool: SqlitePool) {
    let student_id = common::create_student(&pool, "Student A", None).await;
    let loan_id = common::insert_active_loan(
        &pool,
        student_id,
        11,
        common::at(2026, 2, 1, 10, 0),
        common::due(2026, 2, 12),
    )
    .await;

    let repo = SqliteLoanRepository::new(Arc::new(pool));
    let loan = repo.find(loan_id).await.unwrap().unwrap();

    assert_eq!(loan.due_at, common::due(2026, 2, 12));
    assert_eq!(loan.issued_at, common::at(2026, 2, 1, 10, 0));
}

#[sqlx::test]
async fn test_find_not_found(pool: SqlitePool) {
    let repo = SqliteLoanRepository::new(Arc::new(pool));
    assert!(repo.find(4242).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_list_active_due_before_filters_and_orders(pool: SqlitePool) {
    let student_id = common::create_student(&pool, "Student A", None).await;

    let overdue_old = common::insert_active_loan(
        &pool,
        student_id,
        1,
        common::at(2026, 1, 20, 10, 0),
        common::due(2026, 2, 6),
    )
    .await;
    let overdue_recent = common::insert_active_loan(
        &pool,
        student_id,
        2,
        common::at(2026, 1, 29, 10, 0),
        common::due(2026, 2, 12),
    )
    .await;
    // Due in the future: excluded by the storage filter.
    common::insert_active_loan(
        &pool,
        student_id,
        3,
        common::at(2026, 2, 10, 10, 0),
        common::due(2026, 12, 31),
    )
    .await;
    // Already returned: excluded regardless of due date.
    common::insert_returned_loan(
        &pool,
        student_id,
        4,
        common::at(2026, 1, 2, 10, 0),
        common::due(2026, 1, 16),
        common::at(2026, 1, 20, 10, 0),
    )
    .await;

    let repo = SqliteLoanRepository::new(Arc::new(pool));
    let loans = repo
        .list_active_due_before(common::at(2026, 2, 13, 8, 0))
        .await
        .unwrap();

    assert_eq!(loans.len(), 2);
    assert_eq!(loans[0].id, overdue_old);
    assert_eq!(loans[1].id, overdue_recent);
}

#[sqlx::test]
async fn test_guarded_update_applies_renewal(pool: SqlitePool) {
    let student_id = common::create_student(&pool, "Student A", None).await;
    let loan_id = common::insert_active_loan(
        &pool,
        student_id,
        11,
        common::at(2026, 2, 1, 10, 0),
        common::due(2026, 2, 27),
    )
    .await;

    let repo = SqliteLoanRepository::new(Arc::new(pool));
    let mut loan = repo.find(loan_id).await.unwrap().unwrap();

    loan.due_at = common::due(2026, 3, 14);
    loan.renewal_count = 1;
    repo.update(&loan, 0).await.unwrap();

    let reloaded = repo.find(loan_id).await.unwrap().unwrap();
    assert_eq!(reloaded.renewal_count, 1);
    assert_eq!(reloaded.due_at, common::due(2026, 3, 14));
}

#[sqlx::test]
async fn test_guarded_update_detects_lost_race(pool: SqlitePool) {
    let student_id = common::create_student(&pool, "Student A", None).await;
    let loan_id = common::insert_active_loan(
        &pool,
        student_id,
        11,
        common::at(2026, 2, 1, 10, 0),
        common::due(2026, 2, 27),
    )
    .await;

    let repo = SqliteLoanRepository::new(Arc::new(pool));
    let loan = repo.find(loan_id).await.unwrap().unwrap();

    // Two writers read renewal_count = 0; the first renewal wins.
    let mut first = loan.clone();
    first.due_at = common::due(2026, 3, 14);
    first.renewal_count = 1;
    repo.update(&first, 0).await.unwrap();

    let mut second = loan.clone();
    second.status = LoanStatus::Returned;
    second.returned_at = Some(common::at(2026, 2, 20, 11, 0));
    let err = repo.update(&second, 0).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[sqlx::test]
async fn test_guarded_update_never_revives_a_returned_loan(pool: SqlitePool) {
    let student_id = common::create_student(&pool, "Student A", None).await;
    let loan_id = common::insert_returned_loan(
        &pool,
        student_id,
        11,
        common::at(2026, 1, 2, 10, 0),
        common::due(2026, 1, 16),
        common::at(2026, 1, 20, 10, 0),
    )
    .await;

    let repo = SqliteLoanRepository::new(Arc::new(pool));
    let mut loan = repo.find(loan_id).await.unwrap().unwrap();

    loan.status = LoanStatus::Active;
    loan.returned_at = None;
    let err = repo.update(&loan, 0).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
