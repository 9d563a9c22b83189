//! Report history persistence.
//!
//! The entire history lives in one named slot as a JSON array, newest
//! first. Every save is a full read-modify-write: load the list, put the
//! new record in front, overwrite the slot. Single user, single writer; a
//! multi-writer deployment would need to turn this into a transaction.

use std::path::Path;

use tracing::{info, warn};

use crate::db::{self, DbState};
use crate::error::StoreError;
use crate::report::ReportRecord;

/// Slot name holding the serialized report history.
const HISTORY_SLOT: &str = "sales_report_history_v1";

/// Ordered report history, most recent first.
pub type ReportHistory = Vec<ReportRecord>;

/// Store for finished reconciliation reports.
pub struct ReportStore {
    db: DbState,
}

impl ReportStore {
    pub fn new(db: DbState) -> Self {
        Self { db }
    }

    /// Open (or create) the store under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, String> {
        Ok(Self::new(db::init(data_dir)?))
    }

    /// Load the saved history, newest first.
    ///
    /// A slot that was never written is an empty history. Unparseable slot
    /// contents are a [`StoreError::ReadCorrupt`].
    pub fn load_history(&self) -> Result<ReportHistory, StoreError> {
        let conn = self.lock_conn();
        let Some(raw) = db::get_slot(&conn, HISTORY_SLOT) else {
            return Ok(Vec::new());
        };
        let mut history: ReportHistory = serde_json::from_str(&raw)?;
        // Sorted on every read, so a merged or hand-edited slot still
        // displays newest first. Stable: ties keep stored order.
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(history)
    }

    /// Lenient read used by the history view: corruption degrades to an
    /// empty history with a warning instead of failing.
    pub fn load_history_or_empty(&self) -> ReportHistory {
        match self.load_history() {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "Report history unreadable, starting empty");
                Vec::new()
            }
        }
    }

    /// Append a finished report and persist the whole history.
    ///
    /// Returns the updated history for display. The record stays valid in
    /// memory even when the write fails; callers surface
    /// [`StoreError::WriteFailed`] as a warning and still show the receipt.
    pub fn save_report(&self, record: &ReportRecord) -> Result<ReportHistory, StoreError> {
        let mut history = self.load_history_or_empty();
        history.insert(0, record.clone());

        let serialized = serde_json::to_string(&history)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        let conn = self.lock_conn();
        db::set_slot(&conn, HISTORY_SLOT, &serialized)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        info!(
            report_id = %record.id,
            reports = history.len(),
            "Report history saved"
        );
        Ok(history)
    }

    fn lock_conn(&self) -> std::sync::MutexGuard<'_, rusqlite::Connection> {
        // Single-writer store: a poisoned lock still guards valid data.
        match self.db.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, ProductDefinition, UnitKind};
    use crate::report::{build_report, CashInputs, LineItemInput, ReportMeta};
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn test_store() -> ReportStore {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        crate::db::run_migrations_for_test(&conn);
        ReportStore::new(DbState {
            conn: Mutex::new(conn),
            db_path: std::path::PathBuf::from(":memory:"),
        })
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![ProductDefinition {
            id: "EMP".to_string(),
            name: "Empanada".to_string(),
            unit_kind: UnitKind::Discrete,
        }])
    }

    fn sample_record(pos_name: &str) -> ReportRecord {
        build_report(
            &sample_catalog(),
            &ReportMeta {
                date: "2026-08-07".to_string(),
                pos_name: pos_name.to_string(),
            },
            &CashInputs {
                cash_counted: 7_000,
                expenses: 0,
                transfers_received: 0,
                other_income: 0,
            },
            &[LineItemInput {
                product_id: "EMP".to_string(),
                unit_price: 1_000.0,
                quantity_delivered: 10,
                quantity_returned: 3,
            }],
        )
        .expect("valid report")
    }

    #[test]
    fn empty_store_loads_empty_history() {
        let store = test_store();
        assert!(store.load_history().expect("load").is_empty());
    }

    #[test]
    fn saved_record_round_trips_identically() {
        let store = test_store();
        let record = sample_record("Punto Centro");
        store.save_report(&record).expect("save");

        let history = store.load_history().expect("load");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0], record);
    }

    #[test]
    fn history_is_newest_first_after_successive_saves() {
        let store = test_store();
        let first = sample_record("Punto Uno");
        let second = sample_record("Punto Dos");
        store.save_report(&first).expect("save first");
        store.save_report(&second).expect("save second");

        let history = store.load_history().expect("load");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
    }

    #[test]
    fn rejected_report_never_touches_history() {
        let store = test_store();
        let rejected = build_report(
            &sample_catalog(),
            &ReportMeta {
                date: "2026-08-07".to_string(),
                pos_name: "  ".to_string(),
            },
            &CashInputs::default(),
            &[LineItemInput {
                product_id: "EMP".to_string(),
                unit_price: 1_000.0,
                quantity_delivered: 1,
                quantity_returned: 0,
            }],
        );
        assert!(rejected.is_err());
        // Nothing was built, so nothing reaches the store.
        assert!(store.load_history().expect("load").is_empty());
    }

    #[test]
    fn corrupt_slot_reports_and_degrades_to_empty() {
        let store = test_store();
        {
            let conn = store.db.conn.lock().unwrap();
            crate::db::set_slot(&conn, HISTORY_SLOT, "{definitely not json")
                .expect("seed corrupt slot");
        }

        assert!(matches!(
            store.load_history(),
            Err(StoreError::ReadCorrupt(_))
        ));
        assert!(store.load_history_or_empty().is_empty());
    }

    #[test]
    fn saving_over_a_corrupt_slot_starts_a_fresh_history() {
        let store = test_store();
        {
            let conn = store.db.conn.lock().unwrap();
            crate::db::set_slot(&conn, HISTORY_SLOT, "[[[").expect("seed corrupt slot");
        }

        let record = sample_record("Punto Centro");
        let history = store.save_report(&record).expect("save");
        assert_eq!(history.len(), 1);
        assert_eq!(store.load_history().expect("load").len(), 1);
    }
}
