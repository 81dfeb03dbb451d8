//! Core module - fundamental types and utilities

pub mod config;
pub mod identity;
pub mod status;

pub use config::{Config, ConfigError};
pub use identity::{DocumentId, ExpenseId, ShipmentId, UserId};
pub use status::{rank_of, ShipmentStatus};
