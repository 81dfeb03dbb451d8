//! Trigger evaluators
//!
//! Pure mappings from an external event to an optional target status. The
//! tables are intentionally partial: an event with no entry is a no-op, not
//! an error.

use crate::core::status::ShipmentStatus;
use crate::entities::document::DocumentType;
use crate::entities::expense::ExpenseCategory;

/// Target status when a document of the given type lands on a shipment.
///
/// Eligibility (forward-only rank check) is the engine's job; this table only
/// says where a document type points.
pub fn document_target(doc_type: DocumentType) -> Option<ShipmentStatus> {
    match doc_type {
        DocumentType::Bl => Some(ShipmentStatus::Pending),
        DocumentType::Ddi => Some(ShipmentStatus::DdiObtained),
        DocumentType::Declaration => Some(ShipmentStatus::DeclarationFiled),
        DocumentType::Liquidation => Some(ShipmentStatus::LiquidationIssued),
        DocumentType::Quittance => Some(ShipmentStatus::CustomsPaid),
        DocumentType::Bae => Some(ShipmentStatus::BaeIssued),
        DocumentType::TerminalInvoice | DocumentType::TerminalReceipt => {
            Some(ShipmentStatus::TerminalPaid)
        }
        DocumentType::Do => Some(ShipmentStatus::DoReleased),
        DocumentType::ExitNote => Some(ShipmentStatus::ExitNoteIssued),
        DocumentType::DeliveryNote => Some(ShipmentStatus::Delivered),
        DocumentType::Invoice
        | DocumentType::PackingList
        | DocumentType::Other => None,
    }
}

/// Target status when an expense of the given category is marked paid.
///
/// Narrower than the document trigger on purpose: terminal-handling fees only
/// become relevant once the BAE is issued, so the guard is the single step
/// BAE_ISSUED -> TERMINAL_PAID and nothing else. Do not generalize this to a
/// rank comparison.
pub fn expense_target(
    category: ExpenseCategory,
    current: ShipmentStatus,
) -> Option<ShipmentStatus> {
    if category.is_terminal_handling() && current == ShipmentStatus::BaeIssued {
        Some(ShipmentStatus::TerminalPaid)
    } else {
        None
    }
}
