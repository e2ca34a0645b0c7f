//! API response envelope

use serde::{Deserialize, Serialize};

/// Unified API response structure
///
/// ```json
/// {
///   "success": true,
///   "code": "OK",
///   "message": "success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppResponse<T> {
    pub success: bool,
    /// Machine-readable code ("OK" on success, an error code otherwise)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> AppResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "OK".to_string(),
            message: "success".to_string(),
            data: Some(data),
        }
    }

    /// Create a failed response
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }
}
