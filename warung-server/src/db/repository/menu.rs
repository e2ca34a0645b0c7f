//! Menu Repository
//!
//! Seller-maintained catalog. Reads filter on the normalized category and
//! availability; ranking is applied by the catalog service.

use super::{RepoError, RepoResult};
use shared::MenuItem;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct MenuRepository {
    db: Surreal<Db>,
}

impl MenuRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub async fn create(&self, menu: &MenuItem) -> RepoResult<MenuItem> {
        let doc = serde_json::to_value(menu)
            .map_err(|e| RepoError::Database(e.to_string()))?;
        let created: Option<MenuItem> = self
            .db
            .query("CREATE menu CONTENT $doc")
            .bind(("doc", doc))
            .await?
            .take(0)?;
        created.ok_or_else(|| RepoError::Database("menu create returned nothing".into()))
    }

    /// Available menus in a category (already-normalized), unranked
    pub async fn find_available(&self, category: &str) -> RepoResult<Vec<MenuItem>> {
        let menus: Vec<MenuItem> = self
            .db
            .query("SELECT * FROM menu WHERE category = $cat AND available = true")
            .bind(("cat", category.to_string()))
            .await?
            .take(0)?;
        Ok(menus)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let menus: Vec<MenuItem> = self.db.query("SELECT * FROM menu").await?.take(0)?;
        Ok(menus)
    }
}
