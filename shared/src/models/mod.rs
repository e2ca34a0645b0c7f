//! Persisted document shapes
//!
//! All structs serialize with the verbatim camelCase field names external
//! collaborators key off (`requestId`, `buyerMessageId`, `rowIndex`, ...).
//! Timestamps are i64 Unix millis throughout.

mod menu;
mod message;
mod offer;
mod order;
mod request;
mod row;

pub use menu::MenuItem;
pub use message::{Message, SenderType};
pub use offer::Offer;
pub use order::{Order, OrderStatus};
pub use request::{Request, RequestStatus};
pub use row::RequestRow;
