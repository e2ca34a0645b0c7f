//! Unified error handling
//!
//! Provides the application-level error type and response structure:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response envelope
//!
//! # Error classification
//!
//! | Kind | Outward signal | Meaning |
//! |------|----------------|---------|
//! | Validation | 400 | missing/blank input, caller must correct |
//! | NotFound | 404 | referenced request/row/offer/order absent |
//! | Conflict | 409 | state already advanced past the attempted transition |
//! | Store | 503 | transport/commit failure, safe to retry |
//! | Internal | 500 | unexpected failure, logged, surfaced generically |
//!
//! Conflict and not-found reasons are carried as typed codes decided at the
//! point of failure (inside the store transaction for claim/allocate/buy),
//! never recovered by parsing error message strings.

mod response;

pub use response::AppResponse;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Machine-readable conflict reasons
///
/// These codes are part of the external contract; transports surface them
/// verbatim (HTTP 409 body, dialog text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictCode {
    /// The request already reached its terminal purchase state
    AlreadyBought,
    /// All 3 offer/row slots for the target are occupied
    SlotsFull,
    /// The same menu was already offered for this buyer message
    DuplicateOffer,
    /// A request with this id already exists (creation must not regress state)
    RequestExists,
}

impl ConflictCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictCode::AlreadyBought => "ALREADY_BOUGHT",
            ConflictCode::SlotsFull => "SLOTS_FULL",
            ConflictCode::DuplicateOffer => "DUPLICATE_OFFER",
            ConflictCode::RequestExists => "REQUEST_EXISTS",
        }
    }
}

impl std::fmt::Display for ConflictCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource kinds referenced by not-found errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Request,
    Row,
    Offer,
    Menu,
    Order,
    Message,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Request => "REQUEST_NOT_FOUND",
            ResourceKind::Row => "ROW_NOT_FOUND",
            ResourceKind::Offer => "OFFER_NOT_FOUND",
            ResourceKind::Menu => "MENU_NOT_FOUND",
            ResourceKind::Order => "ORDER_NOT_FOUND",
            ResourceKind::Message => "MESSAGE_NOT_FOUND",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Caller errors (4xx) ==========
    #[error("Validation failed: {0}")]
    /// Missing/blank required input (400)
    Validation(String),

    #[error("{0}")]
    /// Referenced document absent (404)
    NotFound(ResourceKind),

    #[error("{0}")]
    /// State already advanced past the attempted transition (409)
    Conflict(ConflictCode),

    // ========== System errors (5xx) ==========
    #[error("Store error: {0}")]
    /// Transport/commit failure, no partial effect, safe to retry (503)
    Store(String),

    #[error("Internal error: {0}")]
    /// Unexpected failure (500)
    Internal(String),
}

impl AppError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a transient store error
    pub fn store(msg: impl std::fmt::Display) -> Self {
        Self::Store(msg.to_string())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True if retrying the operation may succeed without caller changes
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Store(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION".to_string(), msg.clone())
            }
            AppError::NotFound(kind) => (
                StatusCode::NOT_FOUND,
                kind.as_str().to_string(),
                kind.as_str().to_lowercase(),
            ),
            AppError::Conflict(c) => (
                StatusCode::CONFLICT,
                c.as_str().to_string(),
                c.as_str().to_lowercase(),
            ),
            // Transient and internal failures map to a generic outward signal
            // without leaking diagnostic detail.
            AppError::Store(msg) => {
                error!(target: "store", error = %msg, "Store error occurred");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_UNAVAILABLE".to_string(),
                    "store temporarily unavailable".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR".to_string(),
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()>::failure(code, message));
        (status, body).into_response()
    }
}
