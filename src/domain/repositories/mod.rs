//! Repository traits: the storage contracts this core consumes.

mod fine_repository;
mod loan_repository;
mod marker_repository;
mod student_repository;

pub use fine_repository::FineRepository;
pub use loan_repository::LoanRepository;
pub use marker_repository::NoticeMarkerRepository;
pub use student_repository::StudentRepository;

#[cfg(test)]
pub use fine_repository::MockFineRepository;
#[cfg(test)]
pub use loan_repository::MockLoanRepository;
#[cfg(test)]
pub use marker_repository::MockNoticeMarkerRepository;
#[cfg(test)]
pub use student_repository::MockStudentRepository;
