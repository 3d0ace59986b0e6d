//! Core circulation entities.

mod fine;
mod loan;
mod notice;
mod student;

pub use fine::{FineRecord, FineStatus, NewFine};
pub use loan::{Loan, LoanStatus, NewLoan};
pub use notice::OverdueNoticeMarker;
pub use student::Student;
