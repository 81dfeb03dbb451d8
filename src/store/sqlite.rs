//! SQLite-backed store
//!
//! Single-file database, schema created on open. The conditional status
//! write relies on `UPDATE ... WHERE id = ? AND status = ?` so the
//! forward-only check can never act on a stale read.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use ulid::Ulid;

use crate::core::identity::{ExpenseId, ShipmentId, UserId};
use crate::core::status::ShipmentStatus;
use crate::entities::document::Document;
use crate::entities::expense::Expense;
use crate::entities::shipment::{Shipment, ShipmentDetail};
use crate::entities::timeline::TimelineEvent;
use crate::store::{ShipmentStore, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS shipments (
    id              TEXT PRIMARY KEY,
    company_id      TEXT NOT NULL,
    tracking_number TEXT NOT NULL,
    vessel_name     TEXT,
    status          TEXT NOT NULL,
    eta             TEXT,
    ata             TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS documents (
    id          TEXT PRIMARY KEY,
    shipment_id TEXT NOT NULL REFERENCES shipments(id),
    doc_type    TEXT NOT NULL,
    file_name   TEXT NOT NULL,
    uploaded_by TEXT NOT NULL,
    uploaded_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    id           TEXT PRIMARY KEY,
    shipment_id  TEXT NOT NULL REFERENCES shipments(id),
    expense_type TEXT NOT NULL,
    category     TEXT NOT NULL,
    label        TEXT NOT NULL,
    amount       INTEGER NOT NULL,
    paid         INTEGER NOT NULL DEFAULT 0,
    paid_at      TEXT
);

CREATE TABLE IF NOT EXISTS timeline (
    id          TEXT PRIMARY KEY,
    shipment_id TEXT NOT NULL REFERENCES shipments(id),
    action      TEXT NOT NULL,
    description TEXT NOT NULL,
    actor_id    TEXT NOT NULL,
    actor_name  TEXT NOT NULL,
    timestamp   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id   TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_shipments_company ON shipments(company_id, updated_at);
CREATE INDEX IF NOT EXISTS idx_documents_shipment ON documents(shipment_id);
CREATE INDEX IF NOT EXISTS idx_expenses_shipment ON expenses(shipment_id);
CREATE INDEX IF NOT EXISTS idx_timeline_shipment ON timeline(shipment_id);
";

/// SQLite implementation of [`ShipmentStore`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn shipment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Shipment> {
        Ok(Shipment {
            id: row.get("id")?,
            company_id: row.get("company_id")?,
            tracking_number: row.get("tracking_number")?,
            vessel_name: row.get("vessel_name")?,
            status: row.get("status")?,
            eta: row.get::<_, Option<DateTime<Utc>>>("eta")?,
            ata: row.get::<_, Option<DateTime<Utc>>>("ata")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn documents_for(
        conn: &Connection,
        shipment_id: ShipmentId,
    ) -> Result<Vec<Document>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT id, shipment_id, doc_type, file_name, uploaded_by, uploaded_at
             FROM documents WHERE shipment_id = ?1 ORDER BY uploaded_at, id",
        )?;
        let rows = stmt.query_map([shipment_id], |row| {
            Ok(Document {
                id: row.get(0)?,
                shipment_id: row.get(1)?,
                doc_type: row.get(2)?,
                file_name: row.get(3)?,
                uploaded_by: row.get(4)?,
                uploaded_at: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn expenses_for(
        conn: &Connection,
        shipment_id: ShipmentId,
    ) -> Result<Vec<Expense>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT id, shipment_id, expense_type, category, label, amount, paid, paid_at
             FROM expenses WHERE shipment_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map([shipment_id], |row| {
            Ok(Expense {
                id: row.get(0)?,
                shipment_id: row.get(1)?,
                expense_type: row.get(2)?,
                category: row.get(3)?,
                label: row.get(4)?,
                amount: row.get(5)?,
                paid: row.get(6)?,
                paid_at: row.get::<_, Option<DateTime<Utc>>>(7)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn touch(conn: &Connection, shipment_id: ShipmentId) -> Result<(), StoreError> {
        conn.execute(
            "UPDATE shipments SET updated_at = ?1 WHERE id = ?2",
            params![Utc::now(), shipment_id],
        )?;
        Ok(())
    }
}

impl ShipmentStore for SqliteStore {
    fn get_shipment(&self, id: ShipmentId) -> Result<Shipment, StoreError> {
        let conn = self.conn();
        conn.query_row(
            "SELECT * FROM shipments WHERE id = ?1",
            [id],
            Self::shipment_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::not_found("shipment", id))
    }

    fn get_detail(&self, id: ShipmentId) -> Result<ShipmentDetail, StoreError> {
        let conn = self.conn();
        let shipment = conn
            .query_row(
                "SELECT * FROM shipments WHERE id = ?1",
                [id],
                Self::shipment_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::not_found("shipment", id))?;
        Ok(ShipmentDetail {
            documents: Self::documents_for(&conn, id)?,
            expenses: Self::expenses_for(&conn, id)?,
            shipment,
        })
    }

    fn list_active(
        &self,
        company_id: &str,
        limit: usize,
    ) -> Result<Vec<ShipmentDetail>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT * FROM shipments
             WHERE company_id = ?1 AND status NOT IN ('DELIVERED','INVOICED','CLOSED','ARCHIVED')
             ORDER BY updated_at DESC, id ASC LIMIT ?2",
        )?;
        let shipments = stmt
            .query_map(params![company_id, limit as i64], Self::shipment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);

        shipments
            .into_iter()
            .map(|shipment| {
                let id = shipment.id;
                Ok(ShipmentDetail {
                    documents: Self::documents_for(&conn, id)?,
                    expenses: Self::expenses_for(&conn, id)?,
                    shipment,
                })
            })
            .collect()
    }

    fn timeline(&self, shipment_id: ShipmentId) -> Result<Vec<TimelineEvent>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, shipment_id, action, description, actor_id, actor_name, timestamp
             FROM timeline WHERE shipment_id = ?1 ORDER BY timestamp, id",
        )?;
        let rows = stmt.query_map([shipment_id], |row| {
            let raw_id: String = row.get(0)?;
            Ok(TimelineEvent {
                id: raw_id.parse::<Ulid>().unwrap_or_default(),
                shipment_id: row.get(1)?,
                action: row.get(2)?,
                description: row.get(3)?,
                actor_id: row.get(4)?,
                actor_name: row.get(5)?,
                timestamp: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn actor_name(&self, actor_id: UserId) -> Result<String, StoreError> {
        let conn = self.conn();
        conn.query_row("SELECT name FROM users WHERE id = ?1", [actor_id], |row| {
            row.get(0)
        })
        .optional()?
        .ok_or_else(|| StoreError::not_found("user", actor_id))
    }

    fn put_shipment(&self, shipment: &Shipment) -> Result<(), StoreError> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO shipments
             (id, company_id, tracking_number, vessel_name, status, eta, ata, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                shipment.id,
                shipment.company_id,
                shipment.tracking_number,
                shipment.vessel_name,
                shipment.status,
                shipment.eta,
                shipment.ata,
                shipment.created_at,
                shipment.updated_at,
            ],
        )?;
        Ok(())
    }

    fn set_status_if_current_equals(
        &self,
        id: ShipmentId,
        expected: ShipmentStatus,
        new: ShipmentStatus,
    ) -> Result<bool, StoreError> {
        let conn = self.conn();
        let changed = conn.execute(
            "UPDATE shipments SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
            params![new, Utc::now(), id, expected],
        )?;
        if changed > 0 {
            return Ok(true);
        }
        // Distinguish a lost race from a missing row.
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM shipments WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )?;
        if exists {
            Ok(false)
        } else {
            Err(StoreError::not_found("shipment", id))
        }
    }

    fn append_timeline(&self, event: &TimelineEvent) -> Result<(), StoreError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO timeline (id, shipment_id, action, description, actor_id, actor_name, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                event.id.to_string(),
                event.shipment_id,
                event.action,
                event.description,
                event.actor_id,
                event.actor_name,
                event.timestamp,
            ],
        )?;
        Ok(())
    }

    fn add_document(&self, document: &Document) -> Result<(), StoreError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO documents (id, shipment_id, doc_type, file_name, uploaded_by, uploaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                document.id,
                document.shipment_id,
                document.doc_type,
                document.file_name,
                document.uploaded_by,
                document.uploaded_at,
            ],
        )?;
        Self::touch(&conn, document.shipment_id)
    }

    fn add_expense(&self, expense: &Expense) -> Result<(), StoreError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO expenses (id, shipment_id, expense_type, category, label, amount, paid, paid_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                expense.id,
                expense.shipment_id,
                expense.expense_type,
                expense.category,
                expense.label,
                expense.amount,
                expense.paid,
                expense.paid_at,
            ],
        )?;
        Self::touch(&conn, expense.shipment_id)
    }

    fn set_expense_paid(&self, id: ExpenseId) -> Result<(), StoreError> {
        let conn = self.conn();
        let changed = conn.execute(
            "UPDATE expenses SET paid = 1, paid_at = ?1 WHERE id = ?2",
            params![Utc::now(), id],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("expense", id));
        }
        let shipment_id: ShipmentId =
            conn.query_row("SELECT shipment_id FROM expenses WHERE id = ?1", [id], |row| {
                row.get(0)
            })?;
        Self::touch(&conn, shipment_id)
    }

    fn put_user(&self, id: UserId, name: &str) -> Result<(), StoreError> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO users (id, name) VALUES (?1, ?2)",
            params![id, name],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::document::DocumentType;
    use crate::entities::expense::{ExpenseCategory, ExpenseType};

    #[test]
    fn test_shipment_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut shipment = Shipment::new("CO-1", "MSCU1234567");
        shipment.vessel_name = Some("MSC ANIELLO".to_string());
        shipment.eta = Some(Utc::now());
        store.put_shipment(&shipment).unwrap();

        let loaded = store.get_shipment(shipment.id).unwrap();
        assert_eq!(loaded.tracking_number, "MSCU1234567");
        assert_eq!(loaded.vessel_name.as_deref(), Some("MSC ANIELLO"));
        assert_eq!(loaded.status, ShipmentStatus::Draft);
        assert!(loaded.eta.is_some());
        assert!(loaded.ata.is_none());
    }

    #[test]
    fn test_detail_collects_children() {
        let store = SqliteStore::open_in_memory().unwrap();
        let shipment = Shipment::new("CO-1", "TRK-1");
        store.put_shipment(&shipment).unwrap();
        store
            .add_document(&Document::new(
                shipment.id,
                DocumentType::Bl,
                "bl.pdf",
                UserId::new(),
            ))
            .unwrap();
        store
            .add_expense(&Expense::new(
                shipment.id,
                ExpenseType::Disbursement,
                ExpenseCategory::Acconage,
                "Acconage",
                2_000_000,
            ))
            .unwrap();

        let detail = store.get_detail(shipment.id).unwrap();
        assert_eq!(detail.documents.len(), 1);
        assert_eq!(detail.expenses.len(), 1);
        assert_eq!(detail.documents[0].doc_type, DocumentType::Bl);
    }

    #[test]
    fn test_cas_on_stale_status_is_noop() {
        let store = SqliteStore::open_in_memory().unwrap();
        let shipment = Shipment::new("CO-1", "TRK-1");
        store.put_shipment(&shipment).unwrap();

        assert!(store
            .set_status_if_current_equals(
                shipment.id,
                ShipmentStatus::Draft,
                ShipmentStatus::Pending
            )
            .unwrap());
        assert!(!store
            .set_status_if_current_equals(
                shipment.id,
                ShipmentStatus::Draft,
                ShipmentStatus::Arrived
            )
            .unwrap());
    }

    #[test]
    fn test_cas_missing_shipment_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store
            .set_status_if_current_equals(
                ShipmentId::new(),
                ShipmentStatus::Draft,
                ShipmentStatus::Pending,
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_timeline_append_and_read() {
        let store = SqliteStore::open_in_memory().unwrap();
        let shipment = Shipment::new("CO-1", "TRK-1");
        store.put_shipment(&shipment).unwrap();
        let actor = UserId::new();
        store.put_user(actor, "A. Diallo").unwrap();

        store
            .append_timeline(&TimelineEvent::new(
                shipment.id,
                "STATUS_AUTO",
                "DRAFT -> PENDING",
                actor,
                "A. Diallo",
            ))
            .unwrap();

        let events = store.timeline(shipment.id).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, "STATUS_AUTO");
        assert_eq!(events[0].actor_name, "A. Diallo");
        assert_eq!(store.actor_name(actor).unwrap(), "A. Diallo");
    }
}
