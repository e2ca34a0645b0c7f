//! Time helpers
//!
//! All timestamps flow through the repository layer as i64 Unix millis.

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
