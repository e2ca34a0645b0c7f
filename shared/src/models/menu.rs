//! Menu catalog entry

use serde::{Deserialize, Serialize};

/// A catalog entry created and maintained by sellers, read-only to buyers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub name: String,
    pub price: i64,
    pub seller_id: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub eta_minutes: i64,
    #[serde(default)]
    pub rating: f64,
    /// Normalized category (trimmed, lowercased)
    pub category: String,
    pub available: bool,
}

impl MenuItem {
    pub fn vendor_or_dash(&self) -> &str {
        if self.vendor.is_empty() { "-" } else { &self.vendor }
    }
}
