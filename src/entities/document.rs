//! Clearance document records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::{DocumentId, ShipmentId, UserId};

/// Kind of clearance document attached to a shipment.
///
/// The set mirrors the paperwork of a Guinean import file. Types outside it
/// parse to [`DocumentType::Other`], which drives no workflow trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// Bill of lading
    Bl,
    /// Commercial invoice
    Invoice,
    PackingList,
    /// Import declaration request
    Ddi,
    /// Customs declaration
    Declaration,
    /// Customs liquidation (duty assessment)
    Liquidation,
    /// Customs payment receipt
    Quittance,
    /// Bon à enlever - customs release authorization
    Bae,
    /// Delivery order from the shipping line
    Do,
    ExitNote,
    TerminalInvoice,
    TerminalReceipt,
    DeliveryNote,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Bl => "BL",
            DocumentType::Invoice => "INVOICE",
            DocumentType::PackingList => "PACKING_LIST",
            DocumentType::Ddi => "DDI",
            DocumentType::Declaration => "DECLARATION",
            DocumentType::Liquidation => "LIQUIDATION",
            DocumentType::Quittance => "QUITTANCE",
            DocumentType::Bae => "BAE",
            DocumentType::Do => "DO",
            DocumentType::ExitNote => "EXIT_NOTE",
            DocumentType::TerminalInvoice => "TERMINAL_INVOICE",
            DocumentType::TerminalReceipt => "TERMINAL_RECEIPT",
            DocumentType::DeliveryNote => "DELIVERY_NOTE",
            DocumentType::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = std::convert::Infallible;

    /// Unknown labels map to `Other` rather than failing: upload flows accept
    /// arbitrary document kinds and only the known ones matter downstream.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "BL" => DocumentType::Bl,
            "INVOICE" => DocumentType::Invoice,
            "PACKING_LIST" => DocumentType::PackingList,
            "DDI" => DocumentType::Ddi,
            "DECLARATION" => DocumentType::Declaration,
            "LIQUIDATION" => DocumentType::Liquidation,
            "QUITTANCE" => DocumentType::Quittance,
            "BAE" => DocumentType::Bae,
            "DO" => DocumentType::Do,
            "EXIT_NOTE" => DocumentType::ExitNote,
            "TERMINAL_INVOICE" => DocumentType::TerminalInvoice,
            "TERMINAL_RECEIPT" => DocumentType::TerminalReceipt,
            "DELIVERY_NOTE" => DocumentType::DeliveryNote,
            _ => DocumentType::Other,
        })
    }
}

/// A document uploaded against a shipment. Immutable once created apart from
/// display metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub shipment_id: ShipmentId,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub file_name: String,
    pub uploaded_by: UserId,
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        shipment_id: ShipmentId,
        doc_type: DocumentType,
        file_name: impl Into<String>,
        uploaded_by: UserId,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            shipment_id,
            doc_type,
            file_name: file_name.into(),
            uploaded_by,
            uploaded_at: Utc::now(),
        }
    }
}
