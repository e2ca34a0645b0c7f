//! Legacy row/slot model
//!
//! Compatibility mode: a request holds up to 3 numbered slots (0..2), each
//! carrying one seller's menu pitch. First-empty-slot allocation; a slot may
//! be marked bought. The offer model is the authoritative lifecycle.

use serde::{Deserialize, Serialize};

/// One numbered slot on a request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRow {
    pub request_id: String,
    /// Slot number, 0..2
    pub row_index: i64,
    /// Menu pitch text
    pub content: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub is_bought: bool,
    pub updated_at: i64,
}
