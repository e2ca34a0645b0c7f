//! Offer model

use serde::{Deserialize, Serialize};

/// A seller's priced proposal against a specific buyer message.
///
/// For a given (request, buyerMessage) pair at most 3 offers may exist, and
/// no seller may submit the same menu twice for that pair; both rules are
/// enforced transactionally by the slot allocator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub offer_id: String,
    pub request_id: String,
    /// The buyer message this offer answers
    pub buyer_message_id: String,
    pub seller_id: String,
    pub menu_name: String,
    pub price: i64,
    pub vendor: String,
    pub eta_minutes: i64,
    pub rating: f64,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buyer_message_id_field_name_is_verbatim() {
        let offer = Offer {
            offer_id: "off_1".into(),
            request_id: "req_1".into(),
            buyer_message_id: "msg_1".into(),
            seller_id: "seller_a".into(),
            menu_name: "Rendang".into(),
            price: 20000,
            vendor: "Padang Jaya".into(),
            eta_minutes: 15,
            rating: 4.8,
            created_at: 1,
        };
        let v = serde_json::to_value(&offer).unwrap();
        assert_eq!(v.get("buyerMessageId").unwrap(), "msg_1");
        assert_eq!(v.get("menuName").unwrap(), "Rendang");
    }
}
