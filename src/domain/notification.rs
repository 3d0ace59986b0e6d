//! Outbound notification and audit contracts.
//!
//! Delivery itself (SMTP, connectivity checks, provider quotas) lives behind
//! these traits; the core only decides *who* gets *what* and *when*.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Student;
use crate::error::AppError;

/// One overdue loan as it appears in a notice, with its day count
/// recomputed against the same reference instant as the scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueItem {
    pub loan_id: i64,
    pub copy_id: i64,
    pub due_at: DateTime<Utc>,
    pub overdue_days: i64,
}

/// Outbound overdue-notice transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OverdueNotifier: Send + Sync {
    /// Requests dispatch of one notice covering all of a student's overdue
    /// items.
    ///
    /// Returns `false` for ordinary delivery failure (unreachable address,
    /// provider quota, connectivity); the implementation performs its own
    /// checks and never errors for those. The job logs and counts a `false`,
    /// and keeps going with the remaining students.
    async fn send_overdue_notice(&self, student: &Student, items: &[OverdueItem]) -> bool;
}

/// A system-actor audit entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub module: String,
    pub action: String,
    pub description: String,
}

impl AuditEvent {
    /// Summary entry written once per notice-job run.
    pub fn overdue_scan(students_notified: usize) -> Self {
        Self {
            module: "Circulation".to_string(),
            action: "OVERDUE_CHECK".to_string(),
            description: format!("Sent overdue notices to {students_notified} students"),
        }
    }
}

/// Sink for audit entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Records one audit event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on storage errors.
    async fn record(&self, event: AuditEvent) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overdue_scan_event_carries_the_notified_count() {
        let event = AuditEvent::overdue_scan(3);
        assert_eq!(event.module, "Circulation");
        assert_eq!(event.action, "OVERDUE_CHECK");
        assert!(event.description.contains("3 students"));
    }
}
