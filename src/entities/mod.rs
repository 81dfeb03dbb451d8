//! Entity models: shipments, documents, expenses, timeline

pub mod document;
pub mod expense;
pub mod shipment;
pub mod timeline;

pub use document::{Document, DocumentType};
pub use expense::{Expense, ExpenseCategory, ExpenseType};
pub use shipment::{Shipment, ShipmentDetail};
pub use timeline::{TimelineEvent, ACTION_STATUS_AUTO, ACTION_STATUS_MANUAL};
