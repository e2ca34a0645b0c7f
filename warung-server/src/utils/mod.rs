//! Utility module - shared helpers for the server crate
//!
//! Re-exports the unified error types from `shared` alongside local
//! logging, id, time, and validation helpers.

pub mod id;
pub mod logger;
pub mod time;
pub mod validation;

pub use shared::{AppError, AppResult, ConflictCode, ResourceKind};
