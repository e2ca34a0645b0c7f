//! Generated id scheme
//!
//! Prefixed, time-ordered ids based on UUIDv7. The millisecond timestamp
//! prefix of v7 keeps generated ids sortable by creation time, which the
//! claim window ordering relies on for generated documents. Request ids are
//! caller-supplied and not covered here.

use uuid::Uuid;

/// Length of the shortened id body (hex chars after the prefix)
const SHORT_LEN: usize = 20;

fn short_v7() -> String {
    let simple = Uuid::now_v7().simple().to_string();
    simple[..SHORT_LEN].to_string()
}

/// New order id, e.g. `ord_0190f6a2b3c4d5e6f708`
pub fn order_id() -> String {
    format!("ord_{}", short_v7())
}

/// New message id
pub fn message_id() -> String {
    format!("msg_{}", short_v7())
}

/// New offer id
pub fn offer_id() -> String {
    format!("off_{}", short_v7())
}
