//! Expense lines: provisions received and disbursements paid out

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::{ExpenseId, ShipmentId};

/// Direction of money on an expense line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseType {
    /// Working capital received from the client
    Provision,
    /// Money paid out on the client's behalf
    Disbursement,
}

impl std::fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseType::Provision => write!(f, "PROVISION"),
            ExpenseType::Disbursement => write!(f, "DISBURSEMENT"),
        }
    }
}

impl std::str::FromStr for ExpenseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROVISION" => Ok(ExpenseType::Provision),
            "DISBURSEMENT" => Ok(ExpenseType::Disbursement),
            _ => Err(format!("Unknown expense type: {}", s)),
        }
    }
}

/// Category of an expense line.
///
/// Two fixed families matter to the rest of the system: the customs-duty
/// lines of a liquidation (DD, RTL, TVA, PC, CA, BFU) and the
/// terminal-handling fees whose payment can release a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    /// Droit de douane
    Dd,
    /// Redevance de traitement et de liquidation
    Rtl,
    /// Taxe sur la valeur ajoutée
    Tva,
    /// Prélèvement communautaire
    Pc,
    /// Centime additionnel
    Ca,
    /// Bordereau de frais unique
    Bfu,
    Acconage,
    Branchement,
    /// Demurrage charged by the line
    Surestaries,
    Manutention,
    PassageTerre,
    Relevage,
    SecuriteTerminal,
    Transport,
    Autre,
}

impl ExpenseCategory {
    /// Terminal-handling fees. Paying one of these from `BAE_ISSUED` is a
    /// workflow trigger.
    pub fn is_terminal_handling(&self) -> bool {
        matches!(
            self,
            ExpenseCategory::Acconage
                | ExpenseCategory::Branchement
                | ExpenseCategory::Surestaries
                | ExpenseCategory::Manutention
                | ExpenseCategory::PassageTerre
                | ExpenseCategory::Relevage
                | ExpenseCategory::SecuriteTerminal
        )
    }

    /// Customs-duty lines of a liquidation.
    pub fn is_customs_duty(&self) -> bool {
        matches!(
            self,
            ExpenseCategory::Dd
                | ExpenseCategory::Rtl
                | ExpenseCategory::Tva
                | ExpenseCategory::Pc
                | ExpenseCategory::Ca
                | ExpenseCategory::Bfu
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Dd => "DD",
            ExpenseCategory::Rtl => "RTL",
            ExpenseCategory::Tva => "TVA",
            ExpenseCategory::Pc => "PC",
            ExpenseCategory::Ca => "CA",
            ExpenseCategory::Bfu => "BFU",
            ExpenseCategory::Acconage => "ACCONAGE",
            ExpenseCategory::Branchement => "BRANCHEMENT",
            ExpenseCategory::Surestaries => "SURESTARIES",
            ExpenseCategory::Manutention => "MANUTENTION",
            ExpenseCategory::PassageTerre => "PASSAGE_TERRE",
            ExpenseCategory::Relevage => "RELEVAGE",
            ExpenseCategory::SecuriteTerminal => "SECURITE_TERMINAL",
            ExpenseCategory::Transport => "TRANSPORT",
            ExpenseCategory::Autre => "AUTRE",
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DD" => Ok(ExpenseCategory::Dd),
            "RTL" => Ok(ExpenseCategory::Rtl),
            "TVA" => Ok(ExpenseCategory::Tva),
            "PC" => Ok(ExpenseCategory::Pc),
            "CA" => Ok(ExpenseCategory::Ca),
            "BFU" => Ok(ExpenseCategory::Bfu),
            "ACCONAGE" => Ok(ExpenseCategory::Acconage),
            "BRANCHEMENT" => Ok(ExpenseCategory::Branchement),
            "SURESTARIES" => Ok(ExpenseCategory::Surestaries),
            "MANUTENTION" => Ok(ExpenseCategory::Manutention),
            "PASSAGE_TERRE" => Ok(ExpenseCategory::PassageTerre),
            "RELEVAGE" => Ok(ExpenseCategory::Relevage),
            "SECURITE_TERMINAL" => Ok(ExpenseCategory::SecuriteTerminal),
            "TRANSPORT" => Ok(ExpenseCategory::Transport),
            "AUTRE" => Ok(ExpenseCategory::Autre),
            _ => Err(format!("Unknown expense category: {}", s)),
        }
    }
}

/// An expense line on a shipment. Amounts are GNF, which has no minor unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub shipment_id: ShipmentId,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    pub category: ExpenseCategory,
    pub label: String,
    pub amount: i64,
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn new(
        shipment_id: ShipmentId,
        expense_type: ExpenseType,
        category: ExpenseCategory,
        label: impl Into<String>,
        amount: i64,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            shipment_id,
            expense_type,
            category,
            label: label.into(),
            amount,
            paid: false,
            paid_at: None,
        }
    }

    pub fn mark_paid(&mut self) {
        self.paid = true;
        self.paid_at = Some(Utc::now());
    }
}
