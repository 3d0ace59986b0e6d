//! Infrastructure layer: SQLite persistence and notice transports.

pub mod notification;
pub mod persistence;
