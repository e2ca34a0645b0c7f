//! Repository Module
//!
//! Per-table CRUD plus the multi-document transactions the lifecycle
//! depends on. Transactions report their outcome through a tag RETURNed
//! from inside `BEGIN .. COMMIT`, so callers branch on typed outcomes
//! instead of matching on abort messages.

pub mod menu;
pub mod message;
pub mod offer;
pub mod order;
pub mod request;
pub mod row;

pub use menu::MenuRepository;
pub use message::MessageRepository;
pub use offer::OfferRepository;
pub use order::{BuyParams, OrderRepository};
pub use request::RequestRepository;
pub use row::RowRepository;

use shared::{AppError, ConflictCode, ResourceKind};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0:?}")]
    NotFound(ResourceKind),

    #[error("Conflict: {0:?}")]
    Conflict(ConflictCode),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(kind) => AppError::NotFound(kind),
            RepoError::Conflict(code) => AppError::Conflict(code),
            // Engine-level failures include transaction aborts on
            // conflicting concurrent writes; callers may retry.
            RepoError::Database(msg) => AppError::store(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
