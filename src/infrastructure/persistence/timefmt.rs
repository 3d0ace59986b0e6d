//! Timestamp rendering for storage.
//!
//! Instants are stored as RFC 3339 TEXT in the regional offset, e.g.
//! `2026-02-12T23:59:59.999+05:30`. One fixed format for every row keeps
//! lexicographic comparison in SQL chronological.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::civil::civil_offset;
use crate::error::AppError;

/// Renders an instant in the stored form.
pub fn store_instant(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&civil_offset())
        .to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Parses a stored timestamp back to an instant.
///
/// # Errors
///
/// Returns [`AppError::Internal`] when the stored text is not RFC 3339.
pub fn parse_instant(stored: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(stored)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("malformed stored timestamp '{stored}': {e}")))
}
