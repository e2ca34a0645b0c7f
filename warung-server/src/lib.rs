//! Warung Server - buyer/seller marketplace chat backend
//!
//! Core flows:
//!
//! - **Request lifecycle** (`services/lifecycle`): intake, claiming,
//!   conversation and completion of buyer requests
//! - **Offers & slots** (`services/offer_slots`): seller answers, capped
//!   at three per buyer question
//! - **Purchase** (`services/purchase`): the atomic buy transaction
//! - **Catalog** (`services/catalog`): seller-maintained menus queried by
//!   normalized category
//! - **Change feed** (`services/change_feed`): snapshot subscriptions for
//!   watchers
//!
//! # Module structure
//!
//! ```text
//! warung-server/src/
//! ├── core/          # Config, state, server
//! ├── services/      # Business logic
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # Embedded SurrealDB and repositories
//! └── utils/         # Ids, time, logging, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use services::{
    CatalogService, ChangeFeed, OfferSlotService, PurchaseService, RequestLifecycleService,
    Subscription, Topic,
};
pub use utils::{AppError, AppResult};

pub use utils::logger::init_logger_with_file;

/// Load .env, prepare the work directory and start logging
pub fn setup_environment(config: &Config) -> std::io::Result<()> {
    config.ensure_work_dir_structure()?;
    let log_dir = config.log_dir();
    init_logger_with_file(Some(&config.log_level), log_dir.to_str());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
 _    _
| |  | | __ _ _ __ _   _ _ __   __ _
| |/\| |/ _` | '__| | | | '_ \ / _` |
\  /\  / (_| | |  | |_| | | | | (_| |
 \/  \/ \__,_|_|   \__,_|_| |_|\__, |
                               |___/
    "#
    );
}
