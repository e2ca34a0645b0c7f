//! Purchase Service
//!
//! The terminal buy. One transaction validates, creates the order, flips
//! the request to BOUGHT and marks the slot; concurrent buyers of one
//! request yield exactly one order.

use crate::db::repository::{BuyParams, OrderRepository};
use crate::services::{ChangeFeed, Topic};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_ID_LEN, MAX_NAME_LEN, validate_required_text, validate_row_index,
};
use crate::utils::{id, time};
use shared::{AppError, AppResult, Order, OrderStatus, ResourceKind};

#[derive(Clone)]
pub struct PurchaseService {
    orders: OrderRepository,
    feed: ChangeFeed,
}

impl PurchaseService {
    pub fn new(orders: OrderRepository, feed: ChangeFeed) -> Self {
        Self { orders, feed }
    }

    /// Buy the content of one slot. Payment is simulated, so the order is
    /// created PAID.
    ///
    /// Outcomes: the order on success; REQUEST_NOT_FOUND / ROW_NOT_FOUND
    /// when either document is missing; ALREADY_BOUGHT when the request is
    /// terminal. A transient store error means the transaction aborted on
    /// a concurrent write and the call may be retried.
    pub async fn buy(
        &self,
        request_id: &str,
        row_index: i64,
        buyer_name: &str,
        buyer_address: &str,
    ) -> AppResult<Order> {
        validate_required_text(request_id, "requestId", MAX_ID_LEN)?;
        validate_row_index(row_index)?;
        validate_required_text(buyer_name, "buyerName", MAX_NAME_LEN)?;
        validate_required_text(buyer_address, "buyerAddress", MAX_ADDRESS_LEN)?;

        let order = self
            .orders
            .execute_buy(BuyParams {
                request_id: request_id.to_string(),
                row_index,
                order_id: id::order_id(),
                buyer_name: buyer_name.to_string(),
                buyer_address: buyer_address.to_string(),
                now: time::now_millis(),
            })
            .await?;

        tracing::info!(
            request_id,
            row_index,
            order_id = %order.order_id,
            "purchase completed"
        );
        self.feed.publish(Topic::Requests);
        self.feed.publish(Topic::Rows {
            request_id: request_id.to_string(),
        });
        self.feed.publish(Topic::Orders);
        Ok(order)
    }

    /// Record a standalone order (direct intake outside the buy flow)
    pub async fn create_order(
        &self,
        request_id: &str,
        row_index: i64,
        menu: &str,
        vendor: &str,
        price: i64,
        buyer_name: &str,
        buyer_address: &str,
    ) -> AppResult<Order> {
        validate_required_text(request_id, "requestId", MAX_ID_LEN)?;
        validate_required_text(menu, "menu", MAX_NAME_LEN)?;
        if price < 0 {
            return Err(AppError::validation("price must not be negative"));
        }

        let order = Order {
            order_id: id::order_id(),
            request_id: request_id.to_string(),
            row_index,
            menu: menu.to_string(),
            vendor: vendor.to_string(),
            price,
            buyer_name: buyer_name.to_string(),
            buyer_address: buyer_address.to_string(),
            created_at: time::now_millis(),
            status: OrderStatus::NewOrder,
        };
        let created = self.orders.create(&order).await?;
        self.feed.publish(Topic::Orders);
        Ok(created)
    }

    pub async fn get_order(&self, order_id: &str) -> AppResult<Order> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or(AppError::NotFound(ResourceKind::Order))
    }

    pub async fn orders_for_request(&self, request_id: &str) -> AppResult<Vec<Order>> {
        Ok(self.orders.find_by_request(request_id).await?)
    }
}
