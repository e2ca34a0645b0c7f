//! Offer Repository
//!
//! Offers answer one buyer message. The record id is the
//! `[requestId, buyerMessageId, menuKey]` triple, so a seller pitching the
//! same menu twice for one question collides on the id itself; the cap of
//! three offers per question is checked in the same transaction.

use super::{RepoError, RepoResult};
use shared::{ConflictCode, Offer};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Maximum offers per buyer message
pub const MAX_OFFERS: i64 = 3;

#[derive(Clone)]
pub struct OfferRepository {
    db: Surreal<Db>,
}

impl OfferRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Create an offer if the question still has room and this menu has
    /// not been pitched yet. Duplicate check, cap check and create run in
    /// one transaction; concurrent submitters that would break the cap
    /// abort and retry rather than both landing.
    pub async fn try_create(&self, offer: &Offer) -> RepoResult<()> {
        let doc = serde_json::to_value(offer)
            .map_err(|e| RepoError::Database(e.to_string()))?;
        let menu_key = menu_key(&offer.menu_name);
        let outcome: Option<String> = self
            .db
            .query(
                "
                BEGIN;
                LET $dup = (SELECT * FROM ONLY type::thing('offer', [$rid, $mid, $key]));
                LET $cnt = (SELECT count() FROM offer
                            WHERE requestId = $rid AND buyerMessageId = $mid
                            GROUP ALL)[0].count ?? 0;
                LET $outcome = IF $dup != NONE THEN 'DUPLICATE_OFFER'
                    ELSE IF $cnt >= $max THEN 'SLOTS_FULL'
                    ELSE 'OK' END;
                IF $outcome == 'OK' {
                    CREATE type::thing('offer', [$rid, $mid, $key]) CONTENT $doc;
                };
                RETURN $outcome;
                COMMIT;
                ",
            )
            .bind(("rid", offer.request_id.clone()))
            .bind(("mid", offer.buyer_message_id.clone()))
            .bind(("key", menu_key))
            .bind(("max", MAX_OFFERS))
            .bind(("doc", doc))
            .await?
            .take(0)?;

        match outcome.as_deref() {
            Some("OK") => Ok(()),
            Some("DUPLICATE_OFFER") => Err(RepoError::Conflict(ConflictCode::DuplicateOffer)),
            Some("SLOTS_FULL") => Err(RepoError::Conflict(ConflictCode::SlotsFull)),
            other => Err(RepoError::Database(format!(
                "unexpected offer outcome: {other:?}"
            ))),
        }
    }

    /// Offers for one buyer message, oldest first
    pub async fn find_by_message(
        &self,
        request_id: &str,
        buyer_message_id: &str,
    ) -> RepoResult<Vec<Offer>> {
        let offers: Vec<Offer> = self
            .db
            .query(
                "SELECT * FROM offer
                 WHERE requestId = $rid AND buyerMessageId = $mid
                 ORDER BY createdAt ASC",
            )
            .bind(("rid", request_id.to_string()))
            .bind(("mid", buyer_message_id.to_string()))
            .await?
            .take(0)?;
        Ok(offers)
    }

    /// All offers on a request, oldest first
    pub async fn find_by_request(&self, request_id: &str) -> RepoResult<Vec<Offer>> {
        let offers: Vec<Offer> = self
            .db
            .query("SELECT * FROM offer WHERE requestId = $rid ORDER BY createdAt ASC")
            .bind(("rid", request_id.to_string()))
            .await?
            .take(0)?;
        Ok(offers)
    }

    pub async fn count_by_message(
        &self,
        request_id: &str,
        buyer_message_id: &str,
    ) -> RepoResult<i64> {
        let count: Option<i64> = self
            .db
            .query(
                "RETURN (SELECT count() FROM offer
                 WHERE requestId = $rid AND buyerMessageId = $mid
                 GROUP ALL)[0].count ?? 0",
            )
            .bind(("rid", request_id.to_string()))
            .bind(("mid", buyer_message_id.to_string()))
            .await?
            .take(0)?;
        Ok(count.unwrap_or(0))
    }
}

/// Uniqueness key for a menu within one buyer message.
///
/// Normalized the same way request categories are, so "Rendang" and
/// " rendang " count as the same pitch.
pub fn menu_key(menu_name: &str) -> String {
    shared::normalize_category(menu_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_key_normalizes() {
        assert_eq!(menu_key(" Rendang "), "rendang");
        assert_eq!(menu_key("rendang"), menu_key("RENDANG"));
    }
}
