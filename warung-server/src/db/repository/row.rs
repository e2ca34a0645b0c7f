//! Row Repository (legacy slot mode)
//!
//! A request carries up to three numbered slots. The record id is the
//! `[requestId, rowIndex]` pair; allocation picks the first empty index
//! inside a transaction so two sellers never land on the same slot.

use super::{RepoError, RepoResult};
use shared::{ConflictCode, RequestRow};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct RowRepository {
    db: Surreal<Db>,
}

impl RowRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Allocate the first empty slot (0, then 1, then 2) and fill it.
    ///
    /// Returns the allocated index, or `SLOTS_FULL` when all three are
    /// taken. Occupancy scan and create run in one transaction.
    pub async fn allocate(&self, row: &RequestRow) -> RepoResult<i64> {
        let mut doc = serde_json::to_value(row)
            .map_err(|e| RepoError::Database(e.to_string()))?;
        // rowIndex is decided inside the transaction
        if let Some(obj) = doc.as_object_mut() {
            obj.remove("rowIndex");
        }
        let slot: Option<i64> = self
            .db
            .query(
                "
                BEGIN;
                LET $taken = (SELECT VALUE rowIndex FROM request_row WHERE requestId = $rid);
                LET $slot = IF !($taken CONTAINS 0) THEN 0
                    ELSE IF !($taken CONTAINS 1) THEN 1
                    ELSE IF !($taken CONTAINS 2) THEN 2
                    ELSE -1 END;
                IF $slot != -1 {
                    CREATE type::thing('request_row', [$rid, $slot]) CONTENT $doc;
                    UPDATE type::thing('request_row', [$rid, $slot]) SET rowIndex = $slot;
                };
                RETURN $slot;
                COMMIT;
                ",
            )
            .bind(("rid", row.request_id.clone()))
            .bind(("doc", doc))
            .await?
            .take(0)?;

        match slot {
            Some(-1) => Err(RepoError::Conflict(ConflictCode::SlotsFull)),
            Some(idx) => Ok(idx),
            None => Err(RepoError::Database("row allocation returned nothing".into())),
        }
    }

    /// Write a specific slot, replacing whatever occupies it
    pub async fn save(&self, row: &RequestRow) -> RepoResult<RequestRow> {
        let doc = serde_json::to_value(row)
            .map_err(|e| RepoError::Database(e.to_string()))?;
        let saved: Option<RequestRow> = self
            .db
            .query("UPSERT type::thing('request_row', [$rid, $idx]) CONTENT $doc")
            .bind(("rid", row.request_id.clone()))
            .bind(("idx", row.row_index))
            .bind(("doc", doc))
            .await?
            .take(0)?;
        saved.ok_or_else(|| RepoError::Database("row save returned nothing".into()))
    }

    /// Slots of a request in index order
    pub async fn find_by_request(&self, request_id: &str) -> RepoResult<Vec<RequestRow>> {
        let rows: Vec<RequestRow> = self
            .db
            .query("SELECT * FROM request_row WHERE requestId = $rid ORDER BY rowIndex ASC")
            .bind(("rid", request_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }
}
