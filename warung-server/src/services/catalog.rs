//! Catalog Service
//!
//! Seller-maintained menu catalog. Buyers and the row picker query it by
//! the normalized category of a request's text; results are ranked best
//! rating first, then cheapest.

use crate::db::repository::MenuRepository;
use crate::services::{ChangeFeed, Topic};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use shared::{AppError, AppResult, MenuItem};
use std::cmp::Ordering;

#[derive(Clone)]
pub struct CatalogService {
    menus: MenuRepository,
    feed: ChangeFeed,
}

impl CatalogService {
    pub fn new(menus: MenuRepository, feed: ChangeFeed) -> Self {
        Self { menus, feed }
    }

    /// Available menus matching `text`'s category, ranked.
    ///
    /// `text` may be raw request text; it is normalized here, so the query
    /// is insensitive to case and surrounding whitespace.
    pub async fn find_available(&self, text: &str) -> AppResult<Vec<MenuItem>> {
        let category = shared::normalize_category(text);
        if category.is_empty() {
            return Err(AppError::validation("category must not be empty"));
        }
        let mut menus = self.menus.find_available(&category).await?;
        rank_menus(&mut menus);
        Ok(menus)
    }

    /// Add a catalog entry. The stored category is the normalized form of
    /// whatever the seller typed.
    pub async fn create_menu(
        &self,
        name: &str,
        price: i64,
        seller_id: &str,
        vendor: &str,
        eta_minutes: i64,
        rating: f64,
        category: &str,
        available: bool,
    ) -> AppResult<MenuItem> {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
        validate_required_text(seller_id, "sellerId", MAX_NAME_LEN)?;
        validate_required_text(category, "category", MAX_NAME_LEN)?;
        if price < 0 {
            return Err(AppError::validation("price must not be negative"));
        }
        if !(0.0..=5.0).contains(&rating) {
            return Err(AppError::validation("rating must be within 0..5"));
        }

        let menu = MenuItem {
            name: name.to_string(),
            price,
            seller_id: seller_id.to_string(),
            vendor: vendor.to_string(),
            eta_minutes,
            rating,
            category: shared::normalize_category(category),
            available,
        };
        let created = self.menus.create(&menu).await?;
        tracing::info!(name, category = %created.category, "menu created");
        self.feed.publish(Topic::Menus);
        Ok(created)
    }

    pub async fn list_all(&self) -> AppResult<Vec<MenuItem>> {
        Ok(self.menus.find_all().await?)
    }
}

/// Rank in place: rating descending, price ascending on ties.
///
/// Ratings are finite by construction (validated on create), so total_cmp
/// gives the ordering NaN-free callers expect.
pub fn rank_menus(menus: &mut [MenuItem]) {
    menus.sort_by(|a, b| match b.rating.total_cmp(&a.rating) {
        Ordering::Equal => a.price.cmp(&b.price),
        other => other,
    });
}
