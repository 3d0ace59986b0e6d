//! Circulation desk CLI.
//!
//! `serve` runs the daily overdue-notice scheduler; the other subcommands
//! are one-shot operator actions against the same database. Every command
//! supplies `Utc::now()` as the reference instant — the core itself never
//! reads the clock.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use circulation_desk::application::services::{
    run_daily, CirculationService, ConditionFine, OverdueNoticeJob,
};
use circulation_desk::config;
use circulation_desk::domain::entities::FineStatus;
use circulation_desk::domain::repositories::FineRepository;
use circulation_desk::infrastructure::notification::LoggingNotifier;
use circulation_desk::infrastructure::persistence::{
    db, SqliteAuditSink, SqliteFineRepository, SqliteLoanRepository, SqliteMarkerRepository,
    SqliteStudentRepository,
};

/// Library circulation desk.
#[derive(Parser)]
#[command(name = "circulation-desk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daily overdue-notice scheduler until interrupted
    Serve,

    /// Run one overdue-notice scan now and print the summary
    Scan,

    /// Issue a copy to a student
    Issue {
        student_id: i64,
        copy_id: i64,
    },

    /// Renew a loan, extending its due date
    Renew {
        loan_id: i64,
    },

    /// Return a loan, assessing the overdue fine
    Return {
        loan_id: i64,

        /// Additional condition charge (damage/loss), in currency units
        #[arg(long)]
        condition_fine: Option<f64>,

        /// Remark for the condition charge
        #[arg(long, default_value = "Condition charge")]
        condition_remark: String,
    },

    /// Settle an unpaid fine
    SettleFine {
        fine_id: i64,

        /// `paid` or `waived`
        status: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;

    let filter = EnvFilter::new(config.log_level.clone());
    if config.log_format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    config.print_summary();

    let pool = Arc::new(db::connect(&config.database_url).await?);

    let loan_repository = Arc::new(SqliteLoanRepository::new(pool.clone()));
    let fine_repository = Arc::new(SqliteFineRepository::new(pool.clone()));
    let circulation =
        CirculationService::new(loan_repository.clone(), fine_repository.clone(), config.policy);

    let notice_job = || {
        OverdueNoticeJob::new(
            loan_repository.clone(),
            Arc::new(SqliteMarkerRepository::new(pool.clone())),
            Arc::new(SqliteStudentRepository::new(pool.clone())),
            Arc::new(LoggingNotifier::new(config.notice_daily_limit)),
            Arc::new(SqliteAuditSink::new(pool.clone())),
            config.policy,
        )
    };

    match Cli::parse().command {
        Commands::Serve => {
            tracing::info!("starting daily overdue-notice scheduler");
            tokio::select! {
                _ = run_daily(notice_job(), config.notice_hour) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutting down");
                }
            }
        }

        Commands::Scan => {
            let summary = notice_job().run(Utc::now()).await?;
            println!(
                "{}: scanned {} overdue loans, notified {} students ({} dispatch failures){}",
                summary.civil_date,
                summary.overdue_loans,
                summary.students_notified,
                summary.dispatch_failures,
                if summary.skipped { " [already handled today]" } else { "" }
            );
        }

        Commands::Issue { student_id, copy_id } => {
            let loan = circulation.issue_loan(student_id, copy_id, Utc::now()).await?;
            println!("issued loan {} (due {})", loan.id, loan.due_at);
        }

        Commands::Renew { loan_id } => {
            let loan = circulation.renew_loan(loan_id).await?;
            println!(
                "renewed loan {} (renewal {}, due {})",
                loan.id, loan.renewal_count, loan.due_at
            );
        }

        Commands::Return {
            loan_id,
            condition_fine,
            condition_remark,
        } => {
            let condition = condition_fine.map(|amount| ConditionFine {
                amount,
                remark: condition_remark,
            });
            let (loan, fines) = circulation
                .return_loan_with_condition(loan_id, Utc::now(), condition)
                .await?;
            println!("returned loan {}", loan.id);
            for fine in fines {
                println!("  fine {}: {:.2} ({})", fine.id, fine.amount, fine.remark);
            }
        }

        Commands::SettleFine { fine_id, status } => {
            let status = match status.as_str() {
                "paid" => FineStatus::Paid,
                "waived" => FineStatus::Waived,
                other => anyhow::bail!("status must be 'paid' or 'waived', got '{other}'"),
            };
            let fine = fine_repository
                .settle(fine_id, status, Utc::now())
                .await
                .context("failed to settle fine")?;
            println!("fine {} is now {}", fine.id, fine.status.as_str());
        }
    }

    Ok(())
}
