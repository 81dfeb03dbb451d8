//! Shipment lifecycle statuses and their total order
//!
//! The clearance lifecycle is a fixed 16-step sequence. Every ordering
//! comparison in the crate (trigger eligibility, alert completeness checks,
//! milestone rendering) goes through [`ShipmentStatus::rank`], which is
//! derived from the single [`ShipmentStatus::ORDER`] table. Do not introduce
//! a second copy of the order anywhere.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a shipment, from booking to archival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[derive(Default)]
pub enum ShipmentStatus {
    #[default]
    Draft,
    Pending,
    Arrived,
    DdiObtained,
    DeclarationFiled,
    LiquidationIssued,
    CustomsPaid,
    BaeIssued,
    TerminalPaid,
    DoReleased,
    ExitNoteIssued,
    InDelivery,
    Delivered,
    Invoiced,
    Closed,
    Archived,
}

impl ShipmentStatus {
    /// The authoritative lifecycle order. Array position defines rank.
    pub const ORDER: [ShipmentStatus; 16] = [
        ShipmentStatus::Draft,
        ShipmentStatus::Pending,
        ShipmentStatus::Arrived,
        ShipmentStatus::DdiObtained,
        ShipmentStatus::DeclarationFiled,
        ShipmentStatus::LiquidationIssued,
        ShipmentStatus::CustomsPaid,
        ShipmentStatus::BaeIssued,
        ShipmentStatus::TerminalPaid,
        ShipmentStatus::DoReleased,
        ShipmentStatus::ExitNoteIssued,
        ShipmentStatus::InDelivery,
        ShipmentStatus::Delivered,
        ShipmentStatus::Invoiced,
        ShipmentStatus::Closed,
        ShipmentStatus::Archived,
    ];

    /// Position of this status in the lifecycle order.
    pub fn rank(&self) -> usize {
        Self::ORDER
            .iter()
            .position(|s| s == self)
            .expect("every status appears in ORDER")
    }

    /// Whether the shipment is still in the active working set.
    ///
    /// Delivered and later statuses are excluded from alert scans and
    /// dashboard counts.
    pub fn is_active(&self) -> bool {
        !matches!(
            self,
            ShipmentStatus::Delivered
                | ShipmentStatus::Invoiced
                | ShipmentStatus::Closed
                | ShipmentStatus::Archived
        )
    }

    /// Wire/storage label, e.g. `DDI_OBTAINED`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Draft => "DRAFT",
            ShipmentStatus::Pending => "PENDING",
            ShipmentStatus::Arrived => "ARRIVED",
            ShipmentStatus::DdiObtained => "DDI_OBTAINED",
            ShipmentStatus::DeclarationFiled => "DECLARATION_FILED",
            ShipmentStatus::LiquidationIssued => "LIQUIDATION_ISSUED",
            ShipmentStatus::CustomsPaid => "CUSTOMS_PAID",
            ShipmentStatus::BaeIssued => "BAE_ISSUED",
            ShipmentStatus::TerminalPaid => "TERMINAL_PAID",
            ShipmentStatus::DoReleased => "DO_RELEASED",
            ShipmentStatus::ExitNoteIssued => "EXIT_NOTE_ISSUED",
            ShipmentStatus::InDelivery => "IN_DELIVERY",
            ShipmentStatus::Delivered => "DELIVERED",
            ShipmentStatus::Invoiced => "INVOICED",
            ShipmentStatus::Closed => "CLOSED",
            ShipmentStatus::Archived => "ARCHIVED",
        }
    }

    /// Human label for dashboards and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            ShipmentStatus::Draft => "Draft",
            ShipmentStatus::Pending => "Pending arrival",
            ShipmentStatus::Arrived => "Vessel arrived",
            ShipmentStatus::DdiObtained => "DDI obtained",
            ShipmentStatus::DeclarationFiled => "Declaration filed",
            ShipmentStatus::LiquidationIssued => "Liquidation issued",
            ShipmentStatus::CustomsPaid => "Customs duties paid",
            ShipmentStatus::BaeIssued => "BAE issued",
            ShipmentStatus::TerminalPaid => "Terminal fees paid",
            ShipmentStatus::DoReleased => "Delivery order released",
            ShipmentStatus::ExitNoteIssued => "Exit note issued",
            ShipmentStatus::InDelivery => "In delivery",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Invoiced => "Invoiced",
            ShipmentStatus::Closed => "Closed",
            ShipmentStatus::Archived => "Archived",
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ShipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown shipment status: {}", s))
    }
}

/// Rank of a raw status label, `-1` for labels outside the lifecycle.
///
/// For untyped boundaries (database rows, CLI input). The `-1` sentinel is
/// strictly below every real rank, so an unknown label never satisfies a
/// completeness check.
pub fn rank_of(label: &str) -> i32 {
    label
        .parse::<ShipmentStatus>()
        .map_or(-1, |s| s.rank() as i32)
}
