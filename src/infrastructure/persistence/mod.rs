//! SQLite persistence implementations of the domain contracts.

pub mod db;
pub mod timefmt;

mod sqlite_audit_sink;
mod sqlite_fine_repository;
mod sqlite_loan_repository;
mod sqlite_marker_repository;
mod sqlite_student_repository;

pub use sqlite_audit_sink::SqliteAuditSink;
pub use sqlite_fine_repository::SqliteFineRepository;
pub use sqlite_loan_repository::SqliteLoanRepository;
pub use sqlite_marker_repository::SqliteMarkerRepository;
pub use sqlite_student_repository::SqliteStudentRepository;
