//! # Circulation Desk
//!
//! Core of a library circulation system: the civil-calendar overdue/fine
//! algorithm, the loan lifecycle state machine, and the daily idempotent
//! overdue-notice job.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Civil-date arithmetic, overdue
//!   classification, core entities and the repository/notifier traits
//! - **Application Layer** ([`application`]) - Lifecycle orchestration and
//!   the once-per-civil-day notice job
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite persistence and
//!   the notice transport
//!
//! ## Correctness invariant
//!
//! Overdue status is decided by comparing *civil dates* in the library's
//! fixed +05:30 offset, never by subtracting raw instants. A loan due today
//! stays on time until civil midnight; one minute past midnight is exactly
//! one overdue day. Every computation takes its reference instant as a
//! parameter, so the whole core is deterministic and testable with fixed
//! dates.
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://circulation.db"
//! export FINE_RATE_PER_DAY="1.0"
//!
//! # Run the daily notice scheduler
//! cargo run -- serve
//!
//! # One-shot overdue scan
//! cargo run -- scan
//! ```
//!
//! ## Configuration
//!
//! Loaded from environment variables via [`config::Config`]. See the
//! [`config`] module for available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::AppError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{CirculationService, NoticeSummary, OverdueNoticeJob};
    pub use crate::config::{CirculationPolicy, Config};
    pub use crate::domain::entities::{FineRecord, FineStatus, Loan, LoanStatus, NewLoan, Student};
    pub use crate::domain::overdue::OverdueAssessment;
    pub use crate::error::AppError;
}
