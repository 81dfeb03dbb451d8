//! Guinean import duty computation
//!
//! Straight liquidation arithmetic over a CAF (cost-insurance-freight) value
//! in GNF. Rates are basis points so the math stays in integers; each line is
//! rounded half-up on its own.

use serde::{Deserialize, Serialize};

use crate::entities::expense::ExpenseCategory;

/// Duty and tax rates, in basis points of their base, plus the flat BFU fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DutyRates {
    /// Droit de douane - varies with the HS code, so per-file
    pub dd_bp: u32,
    /// Redevance de traitement et de liquidation
    pub rtl_bp: u32,
    /// TVA, applied to CAF + DD + RTL
    pub tva_bp: u32,
    /// Prélèvement communautaire
    pub pc_bp: u32,
    /// Centime additionnel
    pub ca_bp: u32,
    /// Bordereau de frais unique - flat per declaration, GNF
    pub bfu_flat: i64,
}

impl Default for DutyRates {
    fn default() -> Self {
        Self {
            dd_bp: 2000,  // 20%, common consumer-goods band
            rtl_bp: 200,  // 2%
            tva_bp: 1800, // 18%
            pc_bp: 25,    // 0.25%
            ca_bp: 50,    // 0.5%
            bfu_flat: 250_000,
        }
    }
}

/// One line of a duty breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct DutyLine {
    pub category: ExpenseCategory,
    pub base: i64,
    pub amount: i64,
}

/// Computed liquidation for a declaration.
#[derive(Debug, Clone, Serialize)]
pub struct DutyBreakdown {
    pub caf: i64,
    pub lines: Vec<DutyLine>,
    pub total: i64,
}

fn apply_bp(base: i64, bp: u32) -> i64 {
    // Round half-up on the basis-point product.
    (base * i64::from(bp) + 5_000) / 10_000
}

/// Compute the full duty breakdown for a CAF value.
pub fn compute(caf: i64, rates: &DutyRates) -> DutyBreakdown {
    let dd = apply_bp(caf, rates.dd_bp);
    let rtl = apply_bp(caf, rates.rtl_bp);
    // TVA is levied on the duty-inclusive value.
    let tva_base = caf + dd + rtl;
    let tva = apply_bp(tva_base, rates.tva_bp);
    let pc = apply_bp(caf, rates.pc_bp);
    let ca = apply_bp(caf, rates.ca_bp);

    let lines = vec![
        DutyLine {
            category: ExpenseCategory::Dd,
            base: caf,
            amount: dd,
        },
        DutyLine {
            category: ExpenseCategory::Rtl,
            base: caf,
            amount: rtl,
        },
        DutyLine {
            category: ExpenseCategory::Tva,
            base: tva_base,
            amount: tva,
        },
        DutyLine {
            category: ExpenseCategory::Pc,
            base: caf,
            amount: pc,
        },
        DutyLine {
            category: ExpenseCategory::Ca,
            base: caf,
            amount: ca,
        },
        DutyLine {
            category: ExpenseCategory::Bfu,
            base: 0,
            amount: rates.bfu_flat,
        },
    ];
    let total = lines.iter().map(|l| l.amount).sum();

    DutyBreakdown { caf, lines, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_with_default_rates() {
        let breakdown = compute(100_000_000, &DutyRates::default());
        let amount = |cat: ExpenseCategory| {
            breakdown
                .lines
                .iter()
                .find(|l| l.category == cat)
                .unwrap()
                .amount
        };

        assert_eq!(amount(ExpenseCategory::Dd), 20_000_000);
        assert_eq!(amount(ExpenseCategory::Rtl), 2_000_000);
        // TVA base is 122,000,000.
        assert_eq!(amount(ExpenseCategory::Tva), 21_960_000);
        assert_eq!(amount(ExpenseCategory::Pc), 250_000);
        assert_eq!(amount(ExpenseCategory::Ca), 500_000);
        assert_eq!(amount(ExpenseCategory::Bfu), 250_000);
        assert_eq!(breakdown.total, 44_960_000);
    }

    #[test]
    fn test_tva_base_includes_dd_and_rtl() {
        let breakdown = compute(10_000_000, &DutyRates::default());
        let tva_line = breakdown
            .lines
            .iter()
            .find(|l| l.category == ExpenseCategory::Tva)
            .unwrap();
        assert_eq!(tva_line.base, 10_000_000 + 2_000_000 + 200_000);
    }

    #[test]
    fn test_rounding_half_up() {
        // 333 at 0.25% = 0.08325 -> 0; 30_000 at 0.25% = 7.5 -> 8.
        let rates = DutyRates {
            dd_bp: 0,
            rtl_bp: 0,
            tva_bp: 0,
            pc_bp: 25,
            ca_bp: 0,
            bfu_flat: 0,
        };
        assert_eq!(compute(333, &rates).total, 0);
        assert_eq!(compute(30_000, &rates).total, 8);
    }

    #[test]
    fn test_zero_caf_only_flat_fee() {
        let breakdown = compute(0, &DutyRates::default());
        assert_eq!(breakdown.total, 250_000);
    }

    #[test]
    fn test_every_line_is_a_customs_duty_category() {
        let breakdown = compute(1_000_000, &DutyRates::default());
        assert_eq!(breakdown.lines.len(), 6);
        assert!(breakdown.lines.iter().all(|l| l.category.is_customs_duty()));
    }
}
