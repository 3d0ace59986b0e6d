//! Renewal due-date extension.

use chrono::{DateTime, Utc};

use crate::domain::civil::due_after;
use crate::error::AppError;

/// Extends a due instant by `extension_days` whole civil days, re-pinned to
/// the end of the resulting civil day.
///
/// The extension is additive from the *current* due date, not from "today":
/// renewing an already-overdue loan shifts the due date forward from where
/// it was and does not erase the overdue window.
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] when `extension_days` is zero.
pub fn extend(due_at: DateTime<Utc>, extension_days: u32) -> Result<DateTime<Utc>, AppError> {
    if extension_days == 0 {
        return Err(AppError::invalid_input(
            "renewal extension must be at least one day",
        ));
    }
    Ok(due_after(due_at, extension_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::civil::{civil_date_of, civil_offset, days_between, end_of_civil_day};
    use chrono::NaiveDate;

    fn due(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        end_of_civil_day(NaiveDate::from_ymd_opt(y, mo, d).unwrap())
    }

    #[test]
    fn extends_by_exactly_the_requested_civil_days() {
        let current = due(2026, 2, 27);
        let renewed = extend(current, 15).unwrap();

        assert_eq!(
            civil_date_of(renewed),
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
        );
        assert_eq!(days_between(civil_date_of(renewed), civil_date_of(current)), 15);
    }

    #[test]
    fn renewed_due_date_is_end_of_day_pinned() {
        let renewed = extend(due(2026, 2, 27), 15).unwrap();
        let local = renewed.with_timezone(&civil_offset());
        assert_eq!(local.to_rfc3339(), "2026-03-14T23:59:59.999+05:30");
    }

    #[test]
    fn extension_is_from_due_date_not_reference_time() {
        // Already a week overdue; renewal still counts from the old due date.
        let current = due(2026, 2, 10);
        let renewed = extend(current, 7).unwrap();
        assert_eq!(
            civil_date_of(renewed),
            NaiveDate::from_ymd_opt(2026, 2, 17).unwrap()
        );
    }

    #[test]
    fn zero_day_extension_is_rejected() {
        let err = extend(due(2026, 2, 27), 0).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
