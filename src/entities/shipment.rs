//! Shipment entity and its dashboard projection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::ShipmentId;
use crate::core::status::ShipmentStatus;
use crate::entities::document::{Document, DocumentType};
use crate::entities::expense::{Expense, ExpenseType};

/// A shipment under clearance.
///
/// `status` always belongs to the fixed lifecycle order and only moves to a
/// strictly higher rank on the auto-advance path. Shipments are never deleted
/// once customs processing has begun; `ARCHIVED` is the terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub company_id: String,
    pub tracking_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vessel_name: Option<String>,
    pub status: ShipmentStatus,
    /// Estimated time of arrival of the vessel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<DateTime<Utc>>,
    /// Actual time of arrival; starts the demurrage clock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ata: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shipment {
    pub fn new(company_id: impl Into<String>, tracking_number: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ShipmentId::new(),
            company_id: company_id.into(),
            tracking_number: tracking_number.into(),
            vessel_name: None,
            status: ShipmentStatus::Draft,
            eta: None,
            ata: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Shipment plus its documents and expenses - the projection served to the
/// alert engine, the next-step recommender and the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentDetail {
    #[serde(flatten)]
    pub shipment: Shipment,
    pub documents: Vec<Document>,
    pub expenses: Vec<Expense>,
}

impl ShipmentDetail {
    pub fn has_document(&self, doc_type: DocumentType) -> bool {
        self.documents.iter().any(|d| d.doc_type == doc_type)
    }

    /// Total of unpaid disbursements, in GNF.
    pub fn unpaid_disbursements(&self) -> i64 {
        self.expenses
            .iter()
            .filter(|e| e.expense_type == ExpenseType::Disbursement && !e.paid)
            .map(|e| e.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UserId;
    use crate::entities::expense::ExpenseCategory;

    fn detail() -> ShipmentDetail {
        ShipmentDetail {
            shipment: Shipment::new("CO-1", "MSCU1234567"),
            documents: vec![],
            expenses: vec![],
        }
    }

    #[test]
    fn test_new_shipment_starts_in_draft() {
        let shipment = Shipment::new("CO-1", "MSCU1234567");
        assert_eq!(shipment.status, ShipmentStatus::Draft);
        assert!(shipment.eta.is_none());
        assert!(shipment.ata.is_none());
    }

    #[test]
    fn test_has_document() {
        let mut d = detail();
        assert!(!d.has_document(DocumentType::Bl));
        d.documents.push(Document::new(
            d.shipment.id,
            DocumentType::Bl,
            "bl.pdf",
            UserId::new(),
        ));
        assert!(d.has_document(DocumentType::Bl));
        assert!(!d.has_document(DocumentType::Ddi));
    }

    #[test]
    fn test_unpaid_disbursements_ignores_paid_and_provisions() {
        let mut d = detail();
        let sid = d.shipment.id;
        d.expenses.push(Expense::new(
            sid,
            ExpenseType::Disbursement,
            ExpenseCategory::Dd,
            "DD",
            30_000_000,
        ));
        let mut paid = Expense::new(
            sid,
            ExpenseType::Disbursement,
            ExpenseCategory::Acconage,
            "Acconage",
            5_000_000,
        );
        paid.mark_paid();
        d.expenses.push(paid);
        d.expenses.push(Expense::new(
            sid,
            ExpenseType::Provision,
            ExpenseCategory::Autre,
            "Client provision",
            100_000_000,
        ));
        assert_eq!(d.unpaid_disbursements(), 30_000_000);
    }
}
