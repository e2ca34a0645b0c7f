//! Service Layer
//!
//! Business logic between the HTTP facade and the repositories. Services
//! validate input, run the transactional repository operations and publish
//! change notifications on the shared feed.

pub mod catalog;
pub mod change_feed;
pub mod lifecycle;
pub mod offer_slots;
pub mod purchase;

pub use catalog::CatalogService;
pub use change_feed::{ChangeFeed, Subscription, Topic};
pub use lifecycle::RequestLifecycleService;
pub use offer_slots::OfferSlotService;
pub use purchase::PurchaseService;
