//! Persistence boundary
//!
//! [`ShipmentStore`] is the contract the workflow and alert engines program
//! against. The status write is a compare-and-set: callers pass the status
//! they read, and a `false` return means another writer advanced the shipment
//! first (lost race, treated as a no-op upstream). Timeline rows are
//! append-only by construction - the trait exposes no update or delete.

pub mod memory;
pub mod serialize;
pub mod sqlite;

use thiserror::Error;

use crate::core::identity::{ExpenseId, ShipmentId, UserId};
use crate::core::status::ShipmentStatus;
use crate::entities::document::Document;
use crate::entities::expense::Expense;
use crate::entities::shipment::{Shipment, ShipmentDetail};
use crate::entities::timeline::TimelineEvent;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors from the persistence collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Storage contract for shipments and their child records.
pub trait ShipmentStore: Send + Sync {
    // Reads
    fn get_shipment(&self, id: ShipmentId) -> Result<Shipment, StoreError>;
    fn get_detail(&self, id: ShipmentId) -> Result<ShipmentDetail, StoreError>;
    /// Active shipments of a company, most recently updated first, bounded.
    fn list_active(&self, company_id: &str, limit: usize)
        -> Result<Vec<ShipmentDetail>, StoreError>;
    fn timeline(&self, shipment_id: ShipmentId) -> Result<Vec<TimelineEvent>, StoreError>;
    /// Resolve an actor's display name at call time.
    fn actor_name(&self, actor_id: UserId) -> Result<String, StoreError>;

    // Writes
    fn put_shipment(&self, shipment: &Shipment) -> Result<(), StoreError>;
    /// Conditional status write. Returns `false` (without writing) when the
    /// stored status no longer equals `expected`.
    fn set_status_if_current_equals(
        &self,
        id: ShipmentId,
        expected: ShipmentStatus,
        new: ShipmentStatus,
    ) -> Result<bool, StoreError>;
    fn append_timeline(&self, event: &TimelineEvent) -> Result<(), StoreError>;
    fn add_document(&self, document: &Document) -> Result<(), StoreError>;
    fn add_expense(&self, expense: &Expense) -> Result<(), StoreError>;
    fn set_expense_paid(&self, id: ExpenseId) -> Result<(), StoreError>;
    fn put_user(&self, id: UserId, name: &str) -> Result<(), StoreError>;
}
