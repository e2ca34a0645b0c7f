//! Request model
//!
//! A buyer's standing ask for a category of goods, with an evolving status
//! and an attached conversation (messages, offers) or legacy row slots.

use serde::{Deserialize, Serialize};

/// Request lifecycle status
///
/// `New`/`Open` are the two live entry states (REST intake vs conversation
/// mode); `Bought`/`Completed` are the matching terminal states. Transitions
/// are monotonic and never regress.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    New,
    Open,
    Claimed,
    Bought,
    Completed,
}

impl RequestStatus {
    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Bought | RequestStatus::Completed)
    }
}

/// Request document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub request_id: String,
    /// Originating buyer (conversation mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_id: Option<String>,
    /// Free-text body as submitted
    pub text: String,
    /// Normalized lowercase of the text, join key into the menu catalog
    pub category: String,
    pub status: RequestStatus,
    pub created_at: i64,
    pub updated_at: i64,
    /// Most recent buyer message text (conversation mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_buyer_text: Option<String>,
    // ---- terminal purchase reference (row mode) ----
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bought_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bought_row_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bought_order_id: Option<String>,
    // ---- terminal purchase reference (offer mode) ----
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_offer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::New).unwrap(),
            "\"NEW\""
        );
        assert_eq!(
            serde_json::to_string(&RequestStatus::Claimed).unwrap(),
            "\"CLAIMED\""
        );
        assert_eq!(
            serde_json::to_string(&RequestStatus::Bought).unwrap(),
            "\"BOUGHT\""
        );
    }

    #[test]
    fn fields_serialize_camel_case() {
        let req = Request {
            request_id: "req_1".into(),
            buyer_id: None,
            text: "Nasi Padang".into(),
            category: "nasi padang".into(),
            status: RequestStatus::New,
            created_at: 1,
            updated_at: 1,
            latest_buyer_text: None,
            bought_at: None,
            bought_row_index: None,
            bought_order_id: None,
            completed_at: None,
            selected_offer_id: None,
            buyer_name: None,
            address: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert!(v.get("requestId").is_some());
        assert!(v.get("createdAt").is_some());
        assert!(v.get("updatedAt").is_some());
        assert_eq!(v.get("status").unwrap(), "NEW");
    }

    #[test]
    fn terminal_states() {
        assert!(RequestStatus::Bought.is_terminal());
        assert!(RequestStatus::Completed.is_terminal());
        assert!(!RequestStatus::New.is_terminal());
        assert!(!RequestStatus::Claimed.is_terminal());
    }
}
