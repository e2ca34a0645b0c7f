//! Order Repository
//!
//! Orders are top-level documents referencing their request by id. The
//! atomic purchase lives here: one transaction validates the request and
//! slot, creates the order, flips the request to BOUGHT and marks the slot
//! bought. No partial effect survives a failed purchase.

use super::{RepoError, RepoResult};
use shared::{ConflictCode, Order, ResourceKind};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

/// Inputs for the atomic purchase
#[derive(Debug, Clone)]
pub struct BuyParams {
    pub request_id: String,
    pub row_index: i64,
    pub order_id: String,
    pub buyer_name: String,
    pub buyer_address: String,
    pub now: i64,
}

#[derive(Clone)]
pub struct OrderRepository {
    db: Surreal<Db>,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Atomic purchase. Exactly one of these outcomes holds on return:
    /// the full effect landed, or nothing changed and the reason is typed.
    ///
    /// Validation order follows the lifecycle: missing request, then
    /// already-bought, then missing slot. Concurrent buyers of the same
    /// request conflict on the request document and abort; the retrying
    /// loser then observes BOUGHT.
    pub async fn execute_buy(&self, params: BuyParams) -> RepoResult<Order> {
        let outcome: Option<String> = self
            .db
            .query(
                "
                BEGIN;
                LET $req = (SELECT * FROM ONLY type::thing('request', $rid));
                LET $row = (SELECT * FROM ONLY type::thing('request_row', [$rid, $idx]));
                LET $outcome = IF $req == NONE THEN 'REQUEST_NOT_FOUND'
                    ELSE IF $req.status == 'BOUGHT' OR $req.status == 'COMPLETED' THEN 'ALREADY_BOUGHT'
                    ELSE IF $row == NONE THEN 'ROW_NOT_FOUND'
                    ELSE 'OK' END;
                IF $outcome == 'OK' {
                    CREATE type::thing('order', $oid) CONTENT {
                        orderId: $oid,
                        requestId: $rid,
                        rowIndex: $idx,
                        menu: $row.content ?? '',
                        vendor: $row.vendor ?? '',
                        price: $row.price ?? 0,
                        buyerName: $buyer_name,
                        buyerAddress: $buyer_address,
                        createdAt: $now,
                        status: 'PAID'
                    };
                    UPDATE type::thing('request', $rid) MERGE {
                        status: 'BOUGHT',
                        updatedAt: $now,
                        boughtAt: $now,
                        boughtRowIndex: $idx,
                        boughtOrderId: $oid
                    };
                    UPDATE type::thing('request_row', [$rid, $idx]) MERGE {
                        isBought: true,
                        updatedAt: $now
                    };
                };
                RETURN $outcome;
                COMMIT;
                ",
            )
            .bind(("rid", params.request_id.clone()))
            .bind(("idx", params.row_index))
            .bind(("oid", params.order_id.clone()))
            .bind(("buyer_name", params.buyer_name))
            .bind(("buyer_address", params.buyer_address))
            .bind(("now", params.now))
            .await?
            .take(0)?;

        match outcome.as_deref() {
            Some("OK") => self
                .find_by_id(&params.order_id)
                .await?
                .ok_or_else(|| RepoError::Database("order missing after purchase".into())),
            Some("REQUEST_NOT_FOUND") => Err(RepoError::NotFound(ResourceKind::Request)),
            Some("ALREADY_BOUGHT") => Err(RepoError::Conflict(ConflictCode::AlreadyBought)),
            Some("ROW_NOT_FOUND") => Err(RepoError::NotFound(ResourceKind::Row)),
            other => Err(RepoError::Database(format!(
                "unexpected buy outcome: {other:?}"
            ))),
        }
    }

    /// Create a standalone order document (direct intake, status NEW_ORDER)
    pub async fn create(&self, order: &Order) -> RepoResult<Order> {
        let doc = serde_json::to_value(order)
            .map_err(|e| RepoError::Database(e.to_string()))?;
        let created: Option<Order> = self
            .db
            .query("CREATE type::thing($tb, $oid) CONTENT $doc")
            .bind(("tb", ORDER_TABLE))
            .bind(("oid", order.order_id.clone()))
            .bind(("doc", doc))
            .await?
            .take(0)?;
        created.ok_or_else(|| RepoError::Database("order create returned nothing".into()))
    }

    pub async fn find_by_id(&self, order_id: &str) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.db.select((ORDER_TABLE, order_id)).await?;
        Ok(order)
    }

    /// Orders on a request, oldest first
    pub async fn find_by_request(&self, request_id: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .db
            .query("SELECT * FROM order WHERE requestId = $rid ORDER BY createdAt ASC")
            .bind(("rid", request_id.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }
}
