//! Workflow engine: trigger-driven forward-only status advance
//!
//! Called from the document-upload and expense-payment flows after their
//! primary write has committed. The advance is best-effort: every failure is
//! logged and reported as a skip so the calling flow is never blocked by the
//! side-effect path.

use tracing::{error, info, warn};

use crate::core::identity::{ShipmentId, UserId};
use crate::core::status::ShipmentStatus;
use crate::entities::document::DocumentType;
use crate::entities::expense::ExpenseCategory;
use crate::entities::timeline::{TimelineEvent, ACTION_STATUS_AUTO};
use crate::store::ShipmentStore;
use crate::workflow::triggers;

/// Result of a trigger evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Status advanced and a timeline event was appended.
    Advanced {
        from: ShipmentStatus,
        to: ShipmentStatus,
    },
    /// Nothing was written.
    NotAdvanced(SkipReason),
}

/// Why a trigger did not advance the shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The event type has no trigger entry.
    NoTrigger,
    /// The target rank is not strictly ahead of the current rank. Normal for
    /// out-of-order or repeated uploads.
    AlreadyPast,
    /// A concurrent writer advanced the shipment between read and write.
    LostRace,
    /// A store error occurred; details were logged.
    Failed,
}

impl AdvanceOutcome {
    pub fn advanced(&self) -> bool {
        matches!(self, AdvanceOutcome::Advanced { .. })
    }
}

/// Applies trigger targets to persisted shipment state.
pub struct WorkflowEngine<'a> {
    store: &'a dyn ShipmentStore,
}

impl<'a> WorkflowEngine<'a> {
    pub fn new(store: &'a dyn ShipmentStore) -> Self {
        Self { store }
    }

    /// Evaluate a freshly uploaded document against the shipment's status.
    pub fn advance_on_document(
        &self,
        shipment_id: ShipmentId,
        doc_type: DocumentType,
        actor_id: UserId,
    ) -> AdvanceOutcome {
        let Some(target) = triggers::document_target(doc_type) else {
            return AdvanceOutcome::NotAdvanced(SkipReason::NoTrigger);
        };
        self.advance_to(shipment_id, target, actor_id, doc_type.as_str(), false)
    }

    /// Evaluate an expense that was just marked paid.
    pub fn advance_on_expense_paid(
        &self,
        shipment_id: ShipmentId,
        category: ExpenseCategory,
        actor_id: UserId,
    ) -> AdvanceOutcome {
        let current = match self.store.get_shipment(shipment_id) {
            Ok(shipment) => shipment.status,
            Err(e) => {
                warn!(%shipment_id, error = %e, "expense trigger: shipment lookup failed");
                return AdvanceOutcome::NotAdvanced(SkipReason::Failed);
            }
        };
        let Some(target) = triggers::expense_target(category, current) else {
            return AdvanceOutcome::NotAdvanced(SkipReason::NoTrigger);
        };
        self.advance_to(shipment_id, target, actor_id, category.as_str(), true)
    }

    /// Shared advance path: forward-only check, conditional write, timeline
    /// append. `exact_guard` re-checks that the status did not move between
    /// the expense guard evaluation and the write.
    fn advance_to(
        &self,
        shipment_id: ShipmentId,
        target: ShipmentStatus,
        actor_id: UserId,
        trigger_label: &str,
        exact_guard: bool,
    ) -> AdvanceOutcome {
        let current = match self.store.get_shipment(shipment_id) {
            Ok(shipment) => shipment.status,
            Err(e) => {
                warn!(%shipment_id, error = %e, "auto-advance: shipment lookup failed");
                return AdvanceOutcome::NotAdvanced(SkipReason::Failed);
            }
        };

        if exact_guard {
            // Expense trigger: the guard already pinned the expected status;
            // a shipment that moved since then lost the race.
            if current != ShipmentStatus::BaeIssued {
                return AdvanceOutcome::NotAdvanced(SkipReason::LostRace);
            }
        } else if target.rank() <= current.rank() {
            // Documents arrive out of order and get re-uploaded; silently
            // ignoring a backward target is the designed behavior.
            return AdvanceOutcome::NotAdvanced(SkipReason::AlreadyPast);
        }

        match self
            .store
            .set_status_if_current_equals(shipment_id, current, target)
        {
            Ok(true) => {}
            Ok(false) => {
                info!(%shipment_id, %target, "auto-advance: lost race, skipping");
                return AdvanceOutcome::NotAdvanced(SkipReason::LostRace);
            }
            Err(e) => {
                error!(%shipment_id, %target, error = %e, "auto-advance: status write failed");
                return AdvanceOutcome::NotAdvanced(SkipReason::Failed);
            }
        }

        // Resolve the actor name best-effort; the id stands in when the user
        // record is gone.
        let actor_name = self
            .store
            .actor_name(actor_id)
            .unwrap_or_else(|_| actor_id.to_string());

        let event = TimelineEvent::new(
            shipment_id,
            ACTION_STATUS_AUTO,
            format!(
                "Status advanced {} -> {} (trigger: {})",
                current, target, trigger_label
            ),
            actor_id,
            actor_name,
        );
        if let Err(e) = self.store.append_timeline(&event) {
            // The status write already committed; atomicity across the two
            // writes is not guaranteed. Report the advance and log the gap.
            error!(%shipment_id, %target, error = %e, "auto-advance: timeline append failed after status write");
        }

        info!(%shipment_id, from = %current, to = %target, trigger = trigger_label, "shipment auto-advanced");
        AdvanceOutcome::Advanced {
            from: current,
            to: target,
        }
    }
}
