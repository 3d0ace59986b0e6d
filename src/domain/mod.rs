//! Domain layer: civil-calendar arithmetic, overdue classification, core
//! entities and the storage/notification contracts they are served by.

pub mod civil;
pub mod entities;
pub mod notification;
pub mod overdue;
pub mod renewal;
pub mod repositories;
