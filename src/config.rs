//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before anything
//! runs. Policy values (fine rate, loan period, renewal length, renewal
//! limit) are always supplied here — the core never hard-codes them.
//!
//! ## Variables
//!
//! - `DATABASE_URL` - SQLite connection string (default: `sqlite://circulation.db`)
//! - `FINE_RATE_PER_DAY` - fine per whole overdue civil day (default: `1.0`)
//! - `LOAN_PERIOD_DAYS` - issue-to-due length in civil days (default: `14`)
//! - `RENEWAL_EXTENSION_DAYS` - civil days added per renewal (default: `15`)
//! - `MAX_RENEWALS` - renewals allowed per loan (default: `2`)
//! - `NOTICE_HOUR` - civil hour of the daily notice run, 0-23 (default: `8`)
//! - `NOTICE_DAILY_LIMIT` - outbound notices allowed per civil day (default: `500`)
//! - `RUST_LOG` - log level (default: `info`)
//! - `LOG_FORMAT` - `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;

/// Lending policy consumed by the lifecycle service and the notice job.
#[derive(Debug, Clone, Copy)]
pub struct CirculationPolicy {
    /// Fine per whole overdue civil day, in the library's currency.
    pub fine_rate_per_day: f64,
    /// Issue-to-due loan period in civil days.
    pub loan_period_days: u32,
    /// Civil days added by one renewal, counted from the current due date.
    pub renewal_extension_days: u32,
    /// Renewals allowed per loan before `RenewalLimitExceeded`.
    pub max_renewals: u32,
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub policy: CirculationPolicy,
    /// Civil-time hour (0-23) at which the daily notice scan triggers.
    pub notice_hour: u32,
    /// Cap on outbound notices per civil day, enforced by the notifier.
    pub notice_daily_limit: u32,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://circulation.db".to_string());

        let fine_rate_per_day = env::var("FINE_RATE_PER_DAY")
            .ok()
            .map(|v| v.parse::<f64>().context("FINE_RATE_PER_DAY must be a number"))
            .transpose()?
            .unwrap_or(1.0);

        let loan_period_days = env::var("LOAN_PERIOD_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(14);

        let renewal_extension_days = env::var("RENEWAL_EXTENSION_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15);

        let max_renewals = env::var("MAX_RENEWALS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2);

        let notice_hour = env::var("NOTICE_HOUR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8);

        let notice_daily_limit = env::var("NOTICE_DAILY_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(500);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            database_url,
            policy: CirculationPolicy {
                fine_rate_per_day,
                loan_period_days,
                renewal_extension_days,
                max_renewals,
            },
            notice_hour,
            notice_daily_limit,
            log_level,
            log_format,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any policy value is out of range or the database
    /// URL has the wrong scheme.
    pub fn validate(&self) -> Result<()> {
        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        let policy = &self.policy;
        if !policy.fine_rate_per_day.is_finite() || policy.fine_rate_per_day < 0.0 {
            anyhow::bail!(
                "FINE_RATE_PER_DAY must be a non-negative number, got {}",
                policy.fine_rate_per_day
            );
        }

        if policy.loan_period_days == 0 {
            anyhow::bail!("LOAN_PERIOD_DAYS must be at least 1");
        }

        if policy.renewal_extension_days == 0 {
            anyhow::bail!("RENEWAL_EXTENSION_DAYS must be at least 1");
        }

        if self.notice_hour > 23 {
            anyhow::bail!("NOTICE_HOUR must be between 0 and 23, got {}", self.notice_hour);
        }

        if self.notice_daily_limit == 0 {
            anyhow::bail!("NOTICE_DAILY_LIMIT must be at least 1");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        Ok(())
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!("  Fine rate: {}/day", self.policy.fine_rate_per_day);
        tracing::info!("  Loan period: {} days", self.policy.loan_period_days);
        tracing::info!(
            "  Renewal: {} days, max {} renewals",
            self.policy.renewal_extension_days,
            self.policy.max_renewals
        );
        tracing::info!("  Notice run: {:02}:00 civil time", self.notice_hour);
        tracing::info!("  Notice daily limit: {}", self.notice_daily_limit);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if variables fail to parse or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
