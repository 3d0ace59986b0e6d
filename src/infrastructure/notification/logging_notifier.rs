//! Log-backed notice transport.
//!
//! Stands in for a real mail provider: renders each notice as a structured
//! log line. It still enforces the per-civil-day send quota the way a real
//! transport would, so the job sees honest `false` results when the day's
//! budget is spent.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Mutex;

use crate::domain::civil::civil_date_of;
use crate::domain::entities::Student;
use crate::domain::notification::{OverdueItem, OverdueNotifier};

#[derive(Debug)]
struct DailyUsage {
    date: NaiveDate,
    count: u32,
}

#[derive(Serialize)]
struct NoticePayload<'a> {
    student: &'a Student,
    items: &'a [OverdueItem],
}

/// Notifier that logs notices instead of delivering them.
pub struct LoggingNotifier {
    daily_limit: u32,
    usage: Mutex<DailyUsage>,
}

impl LoggingNotifier {
    /// Creates a notifier allowing `daily_limit` sends per civil day.
    pub fn new(daily_limit: u32) -> Self {
        Self {
            daily_limit,
            usage: Mutex::new(DailyUsage {
                date: civil_date_of(Utc::now()),
                count: 0,
            }),
        }
    }

    /// Consumes one send from today's budget. Returns false when spent.
    fn try_consume_quota(&self) -> bool {
        let today = civil_date_of(Utc::now());
        let mut usage = self.usage.lock().unwrap();

        if usage.date != today {
            usage.date = today;
            usage.count = 0;
        }

        if usage.count >= self.daily_limit {
            tracing::warn!(
                count = usage.count,
                limit = self.daily_limit,
                "daily notice limit reached, send blocked"
            );
            return false;
        }

        usage.count += 1;
        true
    }
}

#[async_trait]
impl OverdueNotifier for LoggingNotifier {
    async fn send_overdue_notice(&self, student: &Student, items: &[OverdueItem]) -> bool {
        if !self.try_consume_quota() {
            return false;
        }

        let payload = NoticePayload { student, items };
        match serde_json::to_string(&payload) {
            Ok(json) => {
                tracing::info!(
                    student_id = student.id,
                    items = items.len(),
                    notice = %json,
                    "overdue notice"
                );
                true
            }
            Err(e) => {
                tracing::warn!(student_id = student.id, error = %e, "failed to render notice");
                false
            }
        }
    }
}
