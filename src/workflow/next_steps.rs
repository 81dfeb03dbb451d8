//! Next-step recommender
//!
//! Pure function from (status, documents, expenses) to an ordered action
//! list for the dashboard. List order is the append order of each status
//! branch; it is never re-sorted.

use serde::Serialize;

use crate::core::status::ShipmentStatus;
use crate::entities::document::{Document, DocumentType};
use crate::entities::expense::Expense;

/// Urgency of a recommended step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// What kind of action a step asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStepAction {
    /// Upload a document (see `required_document`)
    UploadDocument,
    /// Pay an outstanding expense
    RecordPayment,
    /// Chase a counterparty or update shipment data
    FollowUp,
}

/// A recommended action for a shipment in its current state.
#[derive(Debug, Clone, Serialize)]
pub struct NextStep {
    pub label: String,
    pub action: NextStepAction,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_document: Option<DocumentType>,
}

impl NextStep {
    fn upload(label: &str, priority: Priority, doc_type: DocumentType) -> Self {
        Self {
            label: label.to_string(),
            action: NextStepAction::UploadDocument,
            priority,
            required_document: Some(doc_type),
        }
    }

    fn pay(label: &str, priority: Priority) -> Self {
        Self {
            label: label.to_string(),
            action: NextStepAction::RecordPayment,
            priority,
            required_document: None,
        }
    }

    fn follow_up(label: &str, priority: Priority) -> Self {
        Self {
            label: label.to_string(),
            action: NextStepAction::FollowUp,
            priority,
            required_document: None,
        }
    }
}

/// Derive the recommended actions for a shipment.
pub fn next_steps(
    status: ShipmentStatus,
    documents: &[Document],
    expenses: &[Expense],
) -> Vec<NextStep> {
    let has = |doc_type: DocumentType| documents.iter().any(|d| d.doc_type == doc_type);
    let unpaid_terminal = expenses
        .iter()
        .any(|e| e.category.is_terminal_handling() && !e.paid);

    let mut steps = Vec::new();
    match status {
        ShipmentStatus::Draft => {
            if !has(DocumentType::Bl) {
                steps.push(NextStep::upload(
                    "Add the bill of lading",
                    Priority::High,
                    DocumentType::Bl,
                ));
            }
            if !has(DocumentType::Invoice) {
                steps.push(NextStep::upload(
                    "Add the commercial invoice",
                    Priority::High,
                    DocumentType::Invoice,
                ));
            }
            steps.push(NextStep::follow_up(
                "Confirm the booking with the shipping line",
                Priority::Medium,
            ));
        }
        ShipmentStatus::Pending => {
            if !has(DocumentType::Bl) {
                steps.push(NextStep::upload(
                    "Add the bill of lading",
                    Priority::High,
                    DocumentType::Bl,
                ));
            }
            if !has(DocumentType::Invoice) {
                steps.push(NextStep::upload(
                    "Add the commercial invoice",
                    Priority::High,
                    DocumentType::Invoice,
                ));
            }
            steps.push(NextStep::follow_up(
                "Request the DDI from customs",
                Priority::Medium,
            ));
        }
        ShipmentStatus::Arrived => {
            if !has(DocumentType::Ddi) {
                steps.push(NextStep::upload(
                    "Obtain the DDI",
                    Priority::High,
                    DocumentType::Ddi,
                ));
            }
            steps.push(NextStep::follow_up(
                "Record the actual arrival time",
                Priority::Medium,
            ));
        }
        ShipmentStatus::DdiObtained => {
            if !has(DocumentType::Declaration) {
                steps.push(NextStep::upload(
                    "File the customs declaration",
                    Priority::High,
                    DocumentType::Declaration,
                ));
            }
        }
        ShipmentStatus::DeclarationFiled => {
            if !has(DocumentType::Liquidation) {
                steps.push(NextStep::upload(
                    "Obtain the liquidation",
                    Priority::High,
                    DocumentType::Liquidation,
                ));
            } else {
                steps.push(NextStep::follow_up(
                    "Follow up with the customs office",
                    Priority::Medium,
                ));
            }
        }
        ShipmentStatus::LiquidationIssued => {
            if !has(DocumentType::Quittance) {
                steps.push(NextStep::upload(
                    "Pay the duties and add the quittance",
                    Priority::High,
                    DocumentType::Quittance,
                ));
            }
        }
        ShipmentStatus::CustomsPaid => {
            if !has(DocumentType::Bae) {
                steps.push(NextStep::upload(
                    "Obtain the BAE",
                    Priority::High,
                    DocumentType::Bae,
                ));
            }
        }
        ShipmentStatus::BaeIssued => {
            if unpaid_terminal {
                steps.push(NextStep::pay(
                    "Pay the terminal handling fees",
                    Priority::High,
                ));
            } else if !has(DocumentType::TerminalReceipt) {
                steps.push(NextStep::upload(
                    "Add the terminal payment receipt",
                    Priority::High,
                    DocumentType::TerminalReceipt,
                ));
            }
        }
        ShipmentStatus::TerminalPaid => {
            if !has(DocumentType::Do) {
                steps.push(NextStep::upload(
                    "Obtain the delivery order",
                    Priority::High,
                    DocumentType::Do,
                ));
            }
        }
        ShipmentStatus::DoReleased => {
            if !has(DocumentType::ExitNote) {
                steps.push(NextStep::upload(
                    "Obtain the exit note",
                    Priority::High,
                    DocumentType::ExitNote,
                ));
            }
        }
        ShipmentStatus::ExitNoteIssued => {
            steps.push(NextStep::follow_up(
                "Schedule the delivery transport",
                Priority::High,
            ));
        }
        ShipmentStatus::InDelivery => {
            if !has(DocumentType::DeliveryNote) {
                steps.push(NextStep::upload(
                    "Confirm delivery with the signed delivery note",
                    Priority::High,
                    DocumentType::DeliveryNote,
                ));
            }
        }
        ShipmentStatus::Delivered => {
            steps.push(NextStep::follow_up("Invoice the client", Priority::High));
        }
        ShipmentStatus::Invoiced => {
            steps.push(NextStep::follow_up(
                "Collect payment and close the file",
                Priority::Medium,
            ));
        }
        ShipmentStatus::Closed => {
            steps.push(NextStep::follow_up("Archive the file", Priority::Low));
        }
        ShipmentStatus::Archived => {}
    }
    steps
}
