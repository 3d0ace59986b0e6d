//! Overdue classification and fine computation.
//!
//! A loan is overdue when the reference instant's *civil date* is strictly
//! later than the due instant's civil date. The fine is the whole-day count
//! times the configured daily rate; fractional-day statistics shown in
//! reports are a display concern and never feed back into money.

use chrono::{DateTime, Utc};

use crate::domain::civil::{civil_date_of, days_between};

/// Result of evaluating a loan's due date against a reference instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverdueAssessment {
    pub is_overdue: bool,
    /// Whole civil days late. Zero when on time or early, never negative.
    pub overdue_days: i64,
    /// `overdue_days * daily_rate`, in the library's currency.
    pub fine: f64,
}

impl OverdueAssessment {
    fn on_time() -> Self {
        Self {
            is_overdue: false,
            overdue_days: 0,
            fine: 0.0,
        }
    }
}

/// Classifies `due_at` against `as_of` and prices the lateness at
/// `daily_rate` per whole civil day.
///
/// A return on the due date's civil day is never overdue, whatever the
/// time-of-day; one civil day later is always exactly one overdue day.
/// Early returns yield a zero fine, never a negative one.
pub fn assess(due_at: DateTime<Utc>, as_of: DateTime<Utc>, daily_rate: f64) -> OverdueAssessment {
    let due_civil = civil_date_of(due_at);
    let now_civil = civil_date_of(as_of);

    if now_civil <= due_civil {
        return OverdueAssessment::on_time();
    }

    let overdue_days = days_between(now_civil, due_civil);
    OverdueAssessment {
        is_overdue: true,
        overdue_days,
        fine: overdue_days as f64 * daily_rate,
    }
}
