//! Offer Slot Service
//!
//! Seller-side answering. In conversation mode a seller submits an offer
//! against the buyer's current question, capped at three per question with
//! no duplicate menus. In legacy row mode the seller fills one of three
//! numbered slots on the request itself.

use crate::db::repository::{
    MenuRepository, MessageRepository, OfferRepository, RequestRepository, RowRepository,
};
use crate::services::catalog;
use crate::services::{ChangeFeed, Subscription, Topic};
use crate::utils::validation::{
    MAX_ID_LEN, MAX_NAME_LEN, validate_required_text, validate_row_index,
};
use crate::utils::{id, time};
use shared::{AppError, AppResult, MenuItem, Offer, RequestRow, ResourceKind};

/// Inputs for a typed (free-form) offer
#[derive(Debug, Clone)]
pub struct OfferDraft {
    pub menu_name: String,
    pub price: i64,
    pub vendor: String,
    pub eta_minutes: i64,
    pub rating: f64,
}

#[derive(Clone)]
pub struct OfferSlotService {
    offers: OfferRepository,
    rows: RowRepository,
    requests: RequestRepository,
    messages: MessageRepository,
    menus: MenuRepository,
    feed: ChangeFeed,
}

impl OfferSlotService {
    pub fn new(
        offers: OfferRepository,
        rows: RowRepository,
        requests: RequestRepository,
        messages: MessageRepository,
        menus: MenuRepository,
        feed: ChangeFeed,
    ) -> Self {
        Self {
            offers,
            rows,
            requests,
            messages,
            menus,
            feed,
        }
    }

    // ========== Offers (conversation mode) ==========

    /// Submit an existing catalog menu as an offer on the buyer's current
    /// question. Fails with SLOTS_FULL past three offers and with
    /// DUPLICATE_OFFER when this menu was already pitched for the question.
    pub async fn send_offer_from_menu(
        &self,
        request_id: &str,
        seller_id: &str,
        menu: &MenuItem,
    ) -> AppResult<Offer> {
        let draft = OfferDraft {
            menu_name: menu.name.clone(),
            price: menu.price,
            vendor: menu.vendor.clone(),
            eta_minutes: menu.eta_minutes,
            rating: menu.rating,
        };
        self.send_offer(request_id, seller_id, draft).await
    }

    /// Submit a free-form offer on the buyer's current question
    pub async fn send_offer(
        &self,
        request_id: &str,
        seller_id: &str,
        draft: OfferDraft,
    ) -> AppResult<Offer> {
        validate_required_text(request_id, "requestId", MAX_ID_LEN)?;
        validate_required_text(seller_id, "sellerId", MAX_ID_LEN)?;
        validate_required_text(&draft.menu_name, "menuName", MAX_NAME_LEN)?;
        if draft.price < 0 {
            return Err(AppError::validation("price must not be negative"));
        }

        if self.requests.find_by_id(request_id).await?.is_none() {
            return Err(AppError::NotFound(ResourceKind::Request));
        }
        let question = self
            .messages
            .find_latest_buyer_message(request_id)
            .await?
            .ok_or(AppError::NotFound(ResourceKind::Message))?;

        let offer = Offer {
            offer_id: id::offer_id(),
            request_id: request_id.to_string(),
            buyer_message_id: question.message_id,
            seller_id: seller_id.to_string(),
            menu_name: draft.menu_name,
            price: draft.price,
            vendor: draft.vendor,
            eta_minutes: draft.eta_minutes,
            rating: draft.rating,
            created_at: time::now_millis(),
        };
        self.offers.try_create(&offer).await?;
        tracing::info!(
            request_id,
            seller_id,
            menu = %offer.menu_name,
            "offer submitted"
        );
        self.feed.publish(Topic::Offers {
            request_id: request_id.to_string(),
        });
        Ok(offer)
    }

    /// Create a catalog menu and immediately pitch it as an offer.
    /// The menu lands in the catalog even if the offer is rejected.
    pub async fn create_menu_and_send_offer(
        &self,
        request_id: &str,
        seller_id: &str,
        menu: MenuItem,
    ) -> AppResult<Offer> {
        let created = self.menus.create(&menu).await?;
        self.feed.publish(Topic::Menus);
        self.send_offer_from_menu(request_id, seller_id, &created)
            .await
    }

    /// Offers answering one buyer message, oldest first
    pub async fn list_offers(
        &self,
        request_id: &str,
        buyer_message_id: &str,
    ) -> AppResult<Vec<Offer>> {
        Ok(self
            .offers
            .find_by_message(request_id, buyer_message_id)
            .await?)
    }

    /// Every offer on a request regardless of which question it answered
    pub async fn list_all_offers(&self, request_id: &str) -> AppResult<Vec<Offer>> {
        Ok(self.offers.find_by_request(request_id).await?)
    }

    pub async fn count_offers(
        &self,
        request_id: &str,
        buyer_message_id: &str,
    ) -> AppResult<i64> {
        Ok(self
            .offers
            .count_by_message(request_id, buyer_message_id)
            .await?)
    }

    // ========== Rows (legacy slot mode) ==========

    /// Put an available menu from the request's category into the first
    /// empty slot. `menu_name` selects the seller's choice (matched with
    /// the same normalization as categories); without it the top-ranked
    /// menu is taken. Returns the filled row.
    pub async fn pick_and_fill_row(
        &self,
        request_id: &str,
        menu_name: Option<&str>,
    ) -> AppResult<RequestRow> {
        validate_required_text(request_id, "requestId", MAX_ID_LEN)?;
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or(AppError::NotFound(ResourceKind::Request))?;

        let mut menus = self.menus.find_available(&request.category).await?;
        catalog::rank_menus(&mut menus);
        let best = match menu_name {
            Some(name) => {
                let key = shared::normalize_category(name);
                menus
                    .into_iter()
                    .find(|m| shared::normalize_category(&m.name) == key)
            }
            None => menus.into_iter().next(),
        }
        .ok_or(AppError::NotFound(ResourceKind::Menu))?;

        let row = RequestRow {
            request_id: request_id.to_string(),
            row_index: 0,
            content: best.name.clone(),
            vendor: best.vendor.clone(),
            price: best.price,
            score: best.rating,
            is_bought: false,
            updated_at: time::now_millis(),
        };
        let slot = self.rows.allocate(&row).await?;
        tracing::info!(request_id, slot, menu = %best.name, "row filled from catalog");
        self.feed.publish(Topic::Rows {
            request_id: request_id.to_string(),
        });
        Ok(RequestRow {
            row_index: slot,
            ..row
        })
    }

    /// Fill the first empty slot with caller-supplied content
    pub async fn fill_first_empty_row(
        &self,
        request_id: &str,
        content: &str,
        vendor: &str,
        price: i64,
        score: f64,
    ) -> AppResult<RequestRow> {
        validate_required_text(request_id, "requestId", MAX_ID_LEN)?;
        validate_required_text(content, "content", MAX_NAME_LEN)?;
        if self.requests.find_by_id(request_id).await?.is_none() {
            return Err(AppError::NotFound(ResourceKind::Request));
        }
        let row = RequestRow {
            request_id: request_id.to_string(),
            row_index: 0,
            content: content.to_string(),
            vendor: vendor.to_string(),
            price,
            score,
            is_bought: false,
            updated_at: time::now_millis(),
        };
        let slot = self.rows.allocate(&row).await?;
        self.feed.publish(Topic::Rows {
            request_id: request_id.to_string(),
        });
        Ok(RequestRow {
            row_index: slot,
            ..row
        })
    }

    /// Overwrite a specific slot (0..2)
    pub async fn save_row(
        &self,
        request_id: &str,
        row_index: i64,
        content: &str,
        vendor: &str,
        price: i64,
        score: f64,
    ) -> AppResult<RequestRow> {
        validate_required_text(request_id, "requestId", MAX_ID_LEN)?;
        validate_required_text(content, "content", MAX_NAME_LEN)?;
        validate_row_index(row_index)?;
        if self.requests.find_by_id(request_id).await?.is_none() {
            return Err(AppError::NotFound(ResourceKind::Request));
        }
        let row = RequestRow {
            request_id: request_id.to_string(),
            row_index,
            content: content.to_string(),
            vendor: vendor.to_string(),
            price,
            score,
            is_bought: false,
            updated_at: time::now_millis(),
        };
        let saved = self.rows.save(&row).await?;
        self.feed.publish(Topic::Rows {
            request_id: request_id.to_string(),
        });
        Ok(saved)
    }

    pub async fn list_rows(&self, request_id: &str) -> AppResult<Vec<RequestRow>> {
        Ok(self.rows.find_by_request(request_id).await?)
    }

    // ========== Watches ==========

    /// Live snapshots of the offers answering one buyer message
    pub fn watch_offers(
        &self,
        request_id: &str,
        buyer_message_id: &str,
    ) -> Subscription<Offer> {
        let repo = self.offers.clone();
        let rid = request_id.to_string();
        let mid = buyer_message_id.to_string();
        let topic_rid = request_id.to_string();
        self.feed.watch(
            move |t| matches!(t, Topic::Offers { request_id } if *request_id == topic_rid),
            move || {
                let repo = repo.clone();
                let rid = rid.clone();
                let mid = mid.clone();
                async move { Ok(repo.find_by_message(&rid, &mid).await?) }
            },
        )
    }

    /// Live snapshots of a request's slots
    pub fn watch_rows(&self, request_id: &str) -> Subscription<RequestRow> {
        let repo = self.rows.clone();
        let rid = request_id.to_string();
        let topic_rid = request_id.to_string();
        self.feed.watch(
            move |t| matches!(t, Topic::Rows { request_id } if *request_id == topic_rid),
            move || {
                let repo = repo.clone();
                let rid = rid.clone();
                async move { Ok(repo.find_by_request(&rid).await?) }
            },
        )
    }
}
