//! Application layer: lifecycle orchestration and the daily notice job.

pub mod services;
