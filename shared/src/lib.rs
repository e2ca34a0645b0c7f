//! Shared types for the Warung marketplace
//!
//! Domain models and the unified application error type used by both the
//! server crate and any client-side tooling.
//!
//! # Modules
//!
//! - [`models`] - persisted document shapes (requests, messages, offers,
//!   rows, menus, orders)
//! - [`error`] - [`AppError`] / [`AppResult`] and the HTTP response mapping

pub mod error;
pub mod models;
pub mod util;

pub use error::{AppError, AppResponse, AppResult, ConflictCode, ResourceKind};
pub use models::{
    MenuItem, Message, Offer, Order, OrderStatus, Request, RequestRow, RequestStatus, SenderType,
};
pub use util::normalize_category;
