//! Request Repository
//!
//! Lifecycle state lives on the `request` document; every transition here
//! is monotonic. The record id is the caller-supplied request id, which
//! makes duplicate creation detectable inside a transaction.

use super::{RepoError, RepoResult};
use shared::{ConflictCode, Request, ResourceKind};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const REQUEST_TABLE: &str = "request";

#[derive(Clone)]
pub struct RequestRepository {
    db: Surreal<Db>,
}

impl RequestRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Create a request document, rejecting duplicates of the same id.
    ///
    /// The existence check and the create run in one transaction so two
    /// concurrent creates of the same id cannot both succeed.
    pub async fn create(&self, request: &Request) -> RepoResult<()> {
        let doc = serde_json::to_value(request)
            .map_err(|e| RepoError::Database(e.to_string()))?;
        let outcome: Option<String> = self
            .db
            .query(
                "
                BEGIN;
                LET $existing = (SELECT * FROM ONLY type::thing($tb, $rid));
                LET $outcome = IF $existing != NONE THEN 'EXISTS' ELSE 'OK' END;
                IF $outcome == 'OK' {
                    CREATE type::thing($tb, $rid) CONTENT $doc;
                };
                RETURN $outcome;
                COMMIT;
                ",
            )
            .bind(("tb", REQUEST_TABLE))
            .bind(("rid", request.request_id.clone()))
            .bind(("doc", doc))
            .await?
            .take(0)?;

        match outcome.as_deref() {
            Some("OK") => Ok(()),
            Some("EXISTS") => Err(RepoError::Conflict(ConflictCode::RequestExists)),
            other => Err(RepoError::Database(format!(
                "unexpected create outcome: {other:?}"
            ))),
        }
    }

    pub async fn find_by_id(&self, request_id: &str) -> RepoResult<Option<Request>> {
        let request: Option<Request> = self
            .db
            .select((REQUEST_TABLE, request_id))
            .await?;
        Ok(request)
    }

    /// Most recently created request, if any
    pub async fn find_latest(&self) -> RepoResult<Option<Request>> {
        let mut requests: Vec<Request> = self
            .db
            .query("SELECT * FROM request ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(if requests.is_empty() {
            None
        } else {
            Some(requests.remove(0))
        })
    }

    /// All non-terminal requests, most recently active first
    pub async fn find_open(&self) -> RepoResult<Vec<Request>> {
        let requests: Vec<Request> = self
            .db
            .query(
                "SELECT * FROM request
                 WHERE status IN ['NEW', 'OPEN', 'CLAIMED']
                 ORDER BY updatedAt DESC",
            )
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// One buyer's requests, most recently active first
    pub async fn find_by_buyer(&self, buyer_id: &str) -> RepoResult<Vec<Request>> {
        let requests: Vec<Request> = self
            .db
            .query("SELECT * FROM request WHERE buyerId = $bid ORDER BY updatedAt DESC")
            .bind(("bid", buyer_id.to_string()))
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Claim one request from the oldest `window` NEW requests.
    ///
    /// The window is sorted ascending by creation time and the newest
    /// member of it is taken, so long-starved requests keep their place
    /// while a claimer still picks up fresh work. Selection and the
    /// status flip happen in one transaction; concurrent claimers abort
    /// instead of double-claiming. Sorting happens before slicing
    /// because combining WHERE, ORDER BY and LIMIT misbehaves on the
    /// embedded engine.
    ///
    /// Returns the claimed request, or None when nothing is NEW.
    pub async fn claim_oldest(&self, window: i64, now: i64) -> RepoResult<Option<Request>> {
        let claimed: Option<Request> = self
            .db
            .query(
                "
                BEGIN;
                LET $batch = array::slice(
                    (SELECT * FROM request WHERE status = 'NEW' ORDER BY createdAt ASC),
                    0, $window
                );
                LET $target = array::last($batch);
                LET $claimed = IF $target != NONE THEN
                    (UPDATE $target.id SET status = 'CLAIMED', updatedAt = $now RETURN AFTER)
                ELSE
                    []
                END;
                RETURN array::first($claimed);
                COMMIT;
                ",
            )
            .bind(("window", window))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(claimed)
    }

    /// Merge a patch into an existing request document.
    ///
    /// Used for the single-document transitions (completion, latest buyer
    /// text). The multi-document purchase flip lives in the order repository.
    pub async fn merge(
        &self,
        request_id: &str,
        patch: serde_json::Value,
    ) -> RepoResult<Request> {
        let updated: Option<Request> = self
            .db
            .query("UPDATE type::thing($tb, $rid) MERGE $patch RETURN AFTER")
            .bind(("tb", REQUEST_TABLE))
            .bind(("rid", request_id.to_string()))
            .bind(("patch", patch))
            .await?
            .take(0)?;
        updated.ok_or(RepoError::NotFound(ResourceKind::Request))
    }
}
