//! Message Repository
//!
//! Messages are immutable once written. The record id is the
//! `[requestId, messageId]` pair, keeping each message unique within its
//! conversation.

use super::RepoResult;
use shared::Message;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct MessageRepository {
    db: Surreal<Db>,
}

impl MessageRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub async fn create(&self, message: &Message) -> RepoResult<Message> {
        let doc = serde_json::to_value(message)
            .map_err(|e| super::RepoError::Database(e.to_string()))?;
        let created: Option<Message> = self
            .db
            .query("CREATE type::thing('message', [$rid, $mid]) CONTENT $doc")
            .bind(("rid", message.request_id.clone()))
            .bind(("mid", message.message_id.clone()))
            .bind(("doc", doc))
            .await?
            .take(0)?;
        created.ok_or_else(|| super::RepoError::Database("message create returned nothing".into()))
    }

    /// Full conversation for a request, oldest first
    pub async fn find_by_request(&self, request_id: &str) -> RepoResult<Vec<Message>> {
        let messages: Vec<Message> = self
            .db
            .query("SELECT * FROM message WHERE requestId = $rid ORDER BY createdAt ASC")
            .bind(("rid", request_id.to_string()))
            .await?
            .take(0)?;
        Ok(messages)
    }

    /// The newest BUYER message in a conversation, if any.
    ///
    /// Ordering without LIMIT, then taking the head in Rust; the embedded
    /// engine misbehaves when WHERE, ORDER BY and LIMIT combine.
    pub async fn find_latest_buyer_message(
        &self,
        request_id: &str,
    ) -> RepoResult<Option<Message>> {
        let mut messages: Vec<Message> = self
            .db
            .query(
                "SELECT * FROM message
                 WHERE requestId = $rid AND senderType = 'BUYER'
                 ORDER BY createdAt DESC",
            )
            .bind(("rid", request_id.to_string()))
            .await?
            .take(0)?;
        Ok(if messages.is_empty() {
            None
        } else {
            Some(messages.remove(0))
        })
    }
}
