//! Order model

use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created by the atomic buy (purchase is simulated, so immediately paid)
    Paid,
    /// Standalone order intake, not yet processed
    NewOrder,
}

/// Order document. A top-level record referencing its request by id; the
/// request is never deleted because an order exists. Immutable after
/// creation except `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub request_id: String,
    pub row_index: i64,
    /// Item/menu name
    pub menu: String,
    pub vendor: String,
    pub price: i64,
    #[serde(default)]
    pub buyer_name: String,
    #[serde(default)]
    pub buyer_address: String,
    pub created_at: i64,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_format() {
        assert_eq!(serde_json::to_string(&OrderStatus::Paid).unwrap(), "\"PAID\"");
        assert_eq!(
            serde_json::to_string(&OrderStatus::NewOrder).unwrap(),
            "\"NEW_ORDER\""
        );
    }
}
