//! Deadline-risk and completeness alerts for the dashboard
//!
//! Derived values, never persisted: each run scans the bounded working set
//! of active shipments and evaluates five independent alert families per
//! shipment. Alert ids are deterministic functions of (shipment, family) so
//! repeated runs produce stable keys for UI diffing.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::warn;

use crate::core::config::Config;
use crate::core::identity::ShipmentId;
use crate::core::status::ShipmentStatus;
use crate::entities::document::DocumentType;
use crate::entities::shipment::ShipmentDetail;
use crate::store::ShipmentStore;

/// Alert severity. Variant order is the sort order: danger first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Danger,
    Warning,
    Info,
}

/// What part of the file an alert concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Vessel,
    Document,
    Finance,
    Deadline,
}

/// A transient dashboard alert. References its shipment; never owns it.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    /// Stable key: `{shipment_id}:{family}`
    pub id: String,
    pub severity: Severity,
    pub category: AlertCategory,
    pub message: String,
    pub shipment_id: ShipmentId,
    pub tracking_number: String,
}

impl Alert {
    fn new(
        detail: &ShipmentDetail,
        family: &str,
        severity: Severity,
        category: AlertCategory,
        message: String,
    ) -> Self {
        Self {
            id: format!("{}:{}", detail.shipment.id, family),
            severity,
            category,
            message,
            shipment_id: detail.shipment.id,
            tracking_number: detail.shipment.tracking_number.clone(),
        }
    }
}

/// Read-side engine producing the prioritized alert feed.
pub struct AlertEngine<'a> {
    store: &'a dyn ShipmentStore,
    config: Config,
}

impl<'a> AlertEngine<'a> {
    pub fn new(store: &'a dyn ShipmentStore, config: Config) -> Self {
        Self { store, config }
    }

    /// Generate the alert feed for a company, most severe first.
    pub fn generate(&self, company_id: &str) -> Vec<Alert> {
        self.generate_at(company_id, Utc::now())
    }

    /// Same as [`generate`](Self::generate) with an injected clock, so
    /// threshold boundaries are testable.
    pub fn generate_at(&self, company_id: &str, now: DateTime<Utc>) -> Vec<Alert> {
        let details = match self.store.list_active(company_id, self.config.working_set_limit) {
            Ok(details) => details,
            Err(e) => {
                // Heuristic feed: degrade to empty rather than failing the
                // dashboard request.
                warn!(company_id, error = %e, "alert scan: listing active shipments failed");
                return Vec::new();
            }
        };

        let mut alerts = Vec::new();
        for detail in &details {
            // One shipment's evaluation going wrong must not empty the whole
            // feed; skip it and keep scanning.
            let evaluated = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                self.shipment_alerts(detail, now)
            }));
            match evaluated {
                Ok(mut shipment_alerts) => alerts.append(&mut shipment_alerts),
                Err(_) => {
                    warn!(shipment_id = %detail.shipment.id, "alert scan: evaluation panicked, shipment skipped");
                }
            }
        }

        // Stable sort on severity only: within a tier, scan order (store
        // order, then family order) is preserved and deterministic.
        alerts.sort_by_key(|a| a.severity);
        alerts
    }

    /// Evaluate the five alert families for one shipment. Each family
    /// contributes at most one alert.
    fn shipment_alerts(&self, detail: &ShipmentDetail, now: DateTime<Utc>) -> Vec<Alert> {
        let mut alerts = Vec::new();
        let shipment = &detail.shipment;
        let rank = shipment.status.rank();

        // 1. Vessel ETA proximity.
        if let Some(eta) = shipment.eta {
            if eta > now && eta - now <= Duration::hours(self.config.eta_window_hours) {
                alerts.push(Alert::new(
                    detail,
                    "vessel",
                    Severity::Warning,
                    AlertCategory::Vessel,
                    format!(
                        "Vessel {} arrives within {}h",
                        shipment.vessel_name.as_deref().unwrap_or("(unknown)"),
                        self.config.eta_window_hours
                    ),
                ));
            } else if eta <= now && shipment.status == ShipmentStatus::Pending {
                alerts.push(Alert::new(
                    detail,
                    "vessel",
                    Severity::Danger,
                    AlertCategory::Vessel,
                    "ETA has passed but the shipment is still pending arrival".to_string(),
                ));
            }
        }

        // 2. Demurrage risk: clock runs from ATA until the DO is released.
        if let Some(ata) = shipment.ata {
            if rank < ShipmentStatus::DoReleased.rank() {
                let on_quay = now - ata;
                let days = on_quay.num_seconds() as f64 / 86_400.0;
                if on_quay >= Duration::days(self.config.demurrage_danger_days) {
                    alerts.push(Alert::new(
                        detail,
                        "demurrage",
                        Severity::Danger,
                        AlertCategory::Deadline,
                        format!("Container on quay for {:.0} days, demurrage running", days),
                    ));
                } else if on_quay > Duration::days(self.config.demurrage_warning_days) {
                    alerts.push(Alert::new(
                        detail,
                        "demurrage",
                        Severity::Warning,
                        AlertCategory::Deadline,
                        format!("Container on quay for {:.0} days, demurrage approaching", days),
                    ));
                }
            }
        }

        // 3. Missing documents, gated on how far the file has progressed.
        if rank >= ShipmentStatus::Arrived.rank() && !detail.has_document(DocumentType::Ddi) {
            alerts.push(Alert::new(
                detail,
                "doc-ddi",
                Severity::Warning,
                AlertCategory::Document,
                "No DDI on file despite vessel arrival".to_string(),
            ));
        }
        if rank >= ShipmentStatus::DdiObtained.rank()
            && !detail.has_document(DocumentType::Declaration)
        {
            alerts.push(Alert::new(
                detail,
                "doc-declaration",
                Severity::Warning,
                AlertCategory::Document,
                "No customs declaration on file".to_string(),
            ));
        }
        if rank >= ShipmentStatus::CustomsPaid.rank() && !detail.has_document(DocumentType::Bae) {
            alerts.push(Alert::new(
                detail,
                "doc-bae",
                Severity::Info,
                AlertCategory::Document,
                "Duties paid but no BAE on file".to_string(),
            ));
        }

        // 4. Unpaid disbursements above the finance threshold.
        let unpaid = detail.unpaid_disbursements();
        if unpaid > self.config.unpaid_disbursement_threshold {
            // Rounded half-up to millions for the message.
            let millions = (unpaid + 500_000) / 1_000_000;
            alerts.push(Alert::new(
                detail,
                "finance",
                Severity::Warning,
                AlertCategory::Finance,
                format!("{} M GNF of disbursements awaiting payment", millions),
            ));
        }

        // 5. Staleness.
        if now - shipment.updated_at > Duration::days(self.config.stale_after_days)
            && rank < ShipmentStatus::Delivered.rank()
        {
            alerts.push(Alert::new(
                detail,
                "stale",
                Severity::Info,
                AlertCategory::Deadline,
                format!(
                    "No activity for more than {} days",
                    self.config.stale_after_days
                ),
            ));
        }

        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UserId;
    use crate::entities::document::Document;
    use crate::entities::expense::{Expense, ExpenseCategory, ExpenseType};
    use crate::entities::shipment::Shipment;
    use crate::store::{MemoryStore, ShipmentStore};

    fn engine_with<'a>(store: &'a MemoryStore) -> AlertEngine<'a> {
        AlertEngine::new(store, Config::default())
    }

    fn shipment_at(status: ShipmentStatus) -> Shipment {
        let mut shipment = Shipment::new("CO-1", "TRK-1");
        shipment.status = status;
        shipment
    }

    #[test]
    fn test_eta_within_window_warns() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut shipment = shipment_at(ShipmentStatus::Pending);
        shipment.vessel_name = Some("KOTA NALURI".to_string());
        shipment.eta = Some(now + Duration::hours(24));
        store.put_shipment(&shipment).unwrap();

        let alerts = engine_with(&store).generate_at("CO-1", now);
        let vessel: Vec<_> = alerts
            .iter()
            .filter(|a| a.category == AlertCategory::Vessel)
            .collect();
        assert_eq!(vessel.len(), 1);
        assert_eq!(vessel[0].severity, Severity::Warning);
        assert!(vessel[0].message.contains("KOTA NALURI"));
    }

    #[test]
    fn test_overdue_eta_still_pending_is_danger() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut shipment = shipment_at(ShipmentStatus::Pending);
        shipment.eta = Some(now - Duration::hours(6));
        store.put_shipment(&shipment).unwrap();

        let alerts = engine_with(&store).generate_at("CO-1", now);
        assert!(alerts
            .iter()
            .any(|a| a.category == AlertCategory::Vessel && a.severity == Severity::Danger));
    }

    #[test]
    fn test_overdue_eta_past_pending_is_quiet() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut shipment = shipment_at(ShipmentStatus::DdiObtained);
        shipment.eta = Some(now - Duration::hours(6));
        store.put_shipment(&shipment).unwrap();

        let alerts = engine_with(&store).generate_at("CO-1", now);
        assert!(!alerts.iter().any(|a| a.category == AlertCategory::Vessel));
    }

    #[test]
    fn test_demurrage_boundaries_are_exact() {
        let store = MemoryStore::new();
        let now = Utc::now();
        // Exactly 7.0 days on quay: danger tier, not warning.
        let mut shipment = shipment_at(ShipmentStatus::BaeIssued);
        shipment.ata = Some(now - Duration::days(7));
        store.put_shipment(&shipment).unwrap();

        let alerts = engine_with(&store).generate_at("CO-1", now);
        let demurrage: Vec<_> = alerts.iter().filter(|a| a.id.ends_with(":demurrage")).collect();
        assert_eq!(demurrage.len(), 1);
        assert_eq!(demurrage[0].severity, Severity::Danger);
    }

    #[test]
    fn test_demurrage_at_exactly_four_days_is_quiet() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut shipment = shipment_at(ShipmentStatus::Arrived);
        shipment.ata = Some(now - Duration::days(4));
        store.put_shipment(&shipment).unwrap();

        let alerts = engine_with(&store).generate_at("CO-1", now);
        assert!(!alerts.iter().any(|a| a.id.ends_with(":demurrage")));
    }

    #[test]
    fn test_demurrage_warning_tier() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut shipment = shipment_at(ShipmentStatus::Arrived);
        shipment.ata = Some(now - Duration::days(5));
        store.put_shipment(&shipment).unwrap();

        let alerts = engine_with(&store).generate_at("CO-1", now);
        let demurrage: Vec<_> = alerts.iter().filter(|a| a.id.ends_with(":demurrage")).collect();
        assert_eq!(demurrage.len(), 1);
        assert_eq!(demurrage[0].severity, Severity::Warning);
    }

    #[test]
    fn test_demurrage_stops_after_do_released() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut shipment = shipment_at(ShipmentStatus::DoReleased);
        shipment.ata = Some(now - Duration::days(10));
        store.put_shipment(&shipment).unwrap();

        let alerts = engine_with(&store).generate_at("CO-1", now);
        assert!(!alerts.iter().any(|a| a.id.ends_with(":demurrage")));
    }

    #[test]
    fn test_missing_document_checks_are_rank_gated() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let shipment = shipment_at(ShipmentStatus::CustomsPaid);
        let sid = shipment.id;
        store.put_shipment(&shipment).unwrap();
        // Declaration present, DDI and BAE absent.
        store
            .add_document(&Document::new(
                sid,
                DocumentType::Declaration,
                "decl.pdf",
                UserId::new(),
            ))
            .unwrap();

        let alerts = engine_with(&store).generate_at("CO-1", now);
        assert!(alerts.iter().any(|a| a.id.ends_with(":doc-ddi")
            && a.severity == Severity::Warning));
        assert!(!alerts.iter().any(|a| a.id.ends_with(":doc-declaration")));
        assert!(alerts
            .iter()
            .any(|a| a.id.ends_with(":doc-bae") && a.severity == Severity::Info));
    }

    #[test]
    fn test_document_checks_quiet_before_gate() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.put_shipment(&shipment_at(ShipmentStatus::Pending)).unwrap();

        let alerts = engine_with(&store).generate_at("CO-1", now);
        assert!(!alerts.iter().any(|a| a.category == AlertCategory::Document));
    }

    #[test]
    fn test_unpaid_disbursements_over_threshold() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let shipment = shipment_at(ShipmentStatus::Draft);
        let sid = shipment.id;
        store.put_shipment(&shipment).unwrap();
        store
            .add_expense(&Expense::new(
                sid,
                ExpenseType::Disbursement,
                ExpenseCategory::Dd,
                "DD",
                60_000_000,
            ))
            .unwrap();

        let alerts = engine_with(&store).generate_at("CO-1", now);
        let finance: Vec<_> = alerts
            .iter()
            .filter(|a| a.category == AlertCategory::Finance)
            .collect();
        assert_eq!(finance.len(), 1);
        assert_eq!(finance[0].severity, Severity::Warning);
        assert!(finance[0].message.contains("60 M GNF"));
    }

    #[test]
    fn test_threshold_is_strict() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let shipment = shipment_at(ShipmentStatus::Draft);
        let sid = shipment.id;
        store.put_shipment(&shipment).unwrap();
        store
            .add_expense(&Expense::new(
                sid,
                ExpenseType::Disbursement,
                ExpenseCategory::Dd,
                "DD",
                50_000_000,
            ))
            .unwrap();

        let alerts = engine_with(&store).generate_at("CO-1", now);
        assert!(!alerts.iter().any(|a| a.category == AlertCategory::Finance));
    }

    #[test]
    fn test_severity_ordering_danger_first() {
        let store = MemoryStore::new();
        let now = Utc::now();

        // Shipment with a stale info alert.
        let mut quiet = shipment_at(ShipmentStatus::Draft);
        quiet.updated_at = now - Duration::days(10);
        store.put_shipment(&quiet).unwrap();

        // Shipment deep in demurrage: danger.
        let mut hot = shipment_at(ShipmentStatus::Pending);
        hot.ata = Some(now - Duration::days(8));
        store.put_shipment(&hot).unwrap();

        let alerts = engine_with(&store).generate_at("CO-1", now);
        assert!(alerts.len() >= 2);
        assert_eq!(alerts[0].severity, Severity::Danger);
        for pair in alerts.windows(2) {
            assert!(pair[0].severity <= pair[1].severity);
        }
    }

    #[test]
    fn test_repeated_runs_are_stable() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut a = shipment_at(ShipmentStatus::Pending);
        a.eta = Some(now - Duration::hours(2));
        let mut b = shipment_at(ShipmentStatus::Arrived);
        b.ata = Some(now - Duration::days(6));
        store.put_shipment(&a).unwrap();
        store.put_shipment(&b).unwrap();

        let engine = engine_with(&store);
        let first = engine.generate_at("CO-1", now);
        let second = engine.generate_at("CO-1", now);
        assert_eq!(
            first.iter().map(|x| &x.id).collect::<Vec<_>>(),
            second.iter().map(|x| &x.id).collect::<Vec<_>>()
        );
        assert_eq!(
            first.iter().map(|x| x.severity).collect::<Vec<_>>(),
            second.iter().map(|x| x.severity).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_inactive_shipments_not_scanned() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut shipment = shipment_at(ShipmentStatus::Delivered);
        shipment.updated_at = now - Duration::days(30);
        store.put_shipment(&shipment).unwrap();

        assert!(engine_with(&store).generate_at("CO-1", now).is_empty());
    }

    #[test]
    fn test_pending_eight_days_on_quay_leads_the_feed() {
        // PENDING, ata 8 days ago, before DO_RELEASED: one danger/deadline
        // alert, sorted ahead of warnings from other shipments.
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut hot = shipment_at(ShipmentStatus::Pending);
        hot.ata = Some(now - Duration::days(8));
        let hot_id = hot.id;
        store.put_shipment(&hot).unwrap();

        let mut warm = shipment_at(ShipmentStatus::Pending);
        warm.eta = Some(now + Duration::hours(12));
        store.put_shipment(&warm).unwrap();

        let alerts = engine_with(&store).generate_at("CO-1", now);
        let first = &alerts[0];
        assert_eq!(first.severity, Severity::Danger);
        assert_eq!(first.category, AlertCategory::Deadline);
        assert_eq!(first.shipment_id, hot_id);
    }
}
