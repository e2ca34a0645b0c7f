//! Chat message model

use serde::{Deserialize, Serialize};

/// Who sent a message within a request conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SenderType {
    Buyer,
    Seller,
}

/// A single chat message. Immutable once created.
///
/// The most recent BUYER message defines the "current question" sellers
/// answer; offers reference it through `buyerMessageId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub request_id: String,
    pub message_id: String,
    pub sender_type: SenderType,
    pub sender_id: String,
    pub text: String,
    pub created_at: i64,
}
