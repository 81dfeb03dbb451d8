//! In-memory store for tests and embedders that bring their own persistence

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use crate::core::identity::{ExpenseId, ShipmentId, UserId};
use crate::core::status::ShipmentStatus;
use crate::entities::document::Document;
use crate::entities::expense::Expense;
use crate::entities::shipment::{Shipment, ShipmentDetail};
use crate::entities::timeline::TimelineEvent;
use crate::store::{ShipmentStore, StoreError};

#[derive(Default)]
struct Inner {
    shipments: HashMap<ShipmentId, Shipment>,
    documents: Vec<Document>,
    expenses: Vec<Expense>,
    timeline: Vec<TimelineEvent>,
    users: HashMap<UserId, String>,
}

/// Mutex-guarded in-memory [`ShipmentStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means another test thread panicked mid-write;
        // the data is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn detail_locked(inner: &Inner, shipment: Shipment) -> ShipmentDetail {
        let id = shipment.id;
        ShipmentDetail {
            shipment,
            documents: inner
                .documents
                .iter()
                .filter(|d| d.shipment_id == id)
                .cloned()
                .collect(),
            expenses: inner
                .expenses
                .iter()
                .filter(|e| e.shipment_id == id)
                .cloned()
                .collect(),
        }
    }
}

impl ShipmentStore for MemoryStore {
    fn get_shipment(&self, id: ShipmentId) -> Result<Shipment, StoreError> {
        self.lock()
            .shipments
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("shipment", id))
    }

    fn get_detail(&self, id: ShipmentId) -> Result<ShipmentDetail, StoreError> {
        let inner = self.lock();
        let shipment = inner
            .shipments
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("shipment", id))?;
        Ok(Self::detail_locked(&inner, shipment))
    }

    fn list_active(
        &self,
        company_id: &str,
        limit: usize,
    ) -> Result<Vec<ShipmentDetail>, StoreError> {
        let inner = self.lock();
        let mut shipments: Vec<Shipment> = inner
            .shipments
            .values()
            .filter(|s| s.company_id == company_id && s.status.is_active())
            .cloned()
            .collect();
        // Deterministic scan order: most recently updated first, id breaks ties.
        shipments.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        shipments.truncate(limit);
        Ok(shipments
            .into_iter()
            .map(|s| Self::detail_locked(&inner, s))
            .collect())
    }

    fn timeline(&self, shipment_id: ShipmentId) -> Result<Vec<TimelineEvent>, StoreError> {
        Ok(self
            .lock()
            .timeline
            .iter()
            .filter(|e| e.shipment_id == shipment_id)
            .cloned()
            .collect())
    }

    fn actor_name(&self, actor_id: UserId) -> Result<String, StoreError> {
        self.lock()
            .users
            .get(&actor_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("user", actor_id))
    }

    fn put_shipment(&self, shipment: &Shipment) -> Result<(), StoreError> {
        self.lock().shipments.insert(shipment.id, shipment.clone());
        Ok(())
    }

    fn set_status_if_current_equals(
        &self,
        id: ShipmentId,
        expected: ShipmentStatus,
        new: ShipmentStatus,
    ) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        let shipment = inner
            .shipments
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("shipment", id))?;
        if shipment.status != expected {
            return Ok(false);
        }
        shipment.status = new;
        shipment.updated_at = Utc::now();
        Ok(true)
    }

    fn append_timeline(&self, event: &TimelineEvent) -> Result<(), StoreError> {
        self.lock().timeline.push(event.clone());
        Ok(())
    }

    fn add_document(&self, document: &Document) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if let Some(shipment) = inner.shipments.get_mut(&document.shipment_id) {
            shipment.updated_at = Utc::now();
        }
        inner.documents.push(document.clone());
        Ok(())
    }

    fn add_expense(&self, expense: &Expense) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if let Some(shipment) = inner.shipments.get_mut(&expense.shipment_id) {
            shipment.updated_at = Utc::now();
        }
        inner.expenses.push(expense.clone());
        Ok(())
    }

    fn set_expense_paid(&self, id: ExpenseId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let expense = inner
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::not_found("expense", id))?;
        expense.mark_paid();
        let shipment_id = expense.shipment_id;
        if let Some(shipment) = inner.shipments.get_mut(&shipment_id) {
            shipment.updated_at = Utc::now();
        }
        Ok(())
    }

    fn put_user(&self, id: UserId, name: &str) -> Result<(), StoreError> {
        self.lock().users.insert(id, name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cas_rejects_stale_expected() {
        let store = MemoryStore::new();
        let shipment = Shipment::new("CO-1", "TRK-1");
        let id = shipment.id;
        store.put_shipment(&shipment).unwrap();

        assert!(store
            .set_status_if_current_equals(id, ShipmentStatus::Draft, ShipmentStatus::Pending)
            .unwrap());
        // Second writer read DRAFT but the row moved on.
        assert!(!store
            .set_status_if_current_equals(id, ShipmentStatus::Draft, ShipmentStatus::Arrived)
            .unwrap());
        assert_eq!(
            store.get_shipment(id).unwrap().status,
            ShipmentStatus::Pending
        );
    }

    #[test]
    fn test_list_active_filters_and_bounds() {
        let store = MemoryStore::new();
        for i in 0..5 {
            let mut s = Shipment::new("CO-1", format!("TRK-{}", i));
            if i == 0 {
                s.status = ShipmentStatus::Delivered;
            }
            store.put_shipment(&s).unwrap();
        }
        store
            .put_shipment(&Shipment::new("CO-2", "OTHER"))
            .unwrap();

        let active = store.list_active("CO-1", 3).unwrap();
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|d| d.shipment.company_id == "CO-1"));
        assert!(active.iter().all(|d| d.shipment.status.is_active()));
    }

    #[test]
    fn test_get_shipment_not_found() {
        let store = MemoryStore::new();
        let err = store.get_shipment(ShipmentId::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "shipment", .. }));
    }
}
