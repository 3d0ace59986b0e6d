//! Application services orchestrating the domain.

mod circulation_service;
mod overdue_notice_job;
mod scheduler;

pub use circulation_service::{CirculationService, ConditionFine};
pub use overdue_notice_job::{NoticeSummary, OverdueNoticeJob};
pub use scheduler::{next_trigger_after, run_daily};
