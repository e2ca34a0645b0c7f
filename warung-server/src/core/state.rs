use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::repository::{
    MenuRepository, MessageRepository, OfferRepository, OrderRepository, RequestRepository,
    RowRepository,
};
use crate::services::{
    CatalogService, ChangeFeed, OfferSlotService, PurchaseService, RequestLifecycleService,
};

/// Shared server state. One instance per process, cloned cheaply into
/// handlers; every service shares the same database handle and change feed.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub feed: ChangeFeed,
    pub lifecycle: RequestLifecycleService,
    pub offers: OfferSlotService,
    pub purchases: PurchaseService,
    pub catalog: CatalogService,
}

impl ServerState {
    /// Initialize against the on-disk database under the work directory
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("warung.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        Ok(Self::assemble(config.clone(), db_service.db))
    }

    /// Initialize against a fresh in-memory database (tests)
    pub async fn initialize_in_memory(config: &Config) -> Result<Self> {
        let db_service = DbService::new_mem().await?;
        Ok(Self::assemble(config.clone(), db_service.db))
    }

    fn assemble(config: Config, db: Surreal<Db>) -> Self {
        let feed = ChangeFeed::new();

        let requests = RequestRepository::new(db.clone());
        let messages = MessageRepository::new(db.clone());
        let offers = OfferRepository::new(db.clone());
        let rows = RowRepository::new(db.clone());
        let menus = MenuRepository::new(db.clone());
        let orders = OrderRepository::new(db.clone());

        let lifecycle = RequestLifecycleService::new(
            requests.clone(),
            messages.clone(),
            feed.clone(),
            config.claim_window,
        );
        let offer_slots = OfferSlotService::new(
            offers,
            rows,
            requests,
            messages,
            menus.clone(),
            feed.clone(),
        );
        let purchases = PurchaseService::new(orders, feed.clone());
        let catalog = CatalogService::new(menus, feed.clone());

        Self {
            config,
            db,
            feed,
            lifecycle,
            offers: offer_slots,
            purchases,
            catalog,
        }
    }
}
