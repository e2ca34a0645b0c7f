//! HTTP API
//!
//! Thin REST facade over the service layer. Routers are split per area;
//! handlers validate nothing themselves beyond deserialization, the
//! services own the rules.

pub mod buyer;
pub mod health;
pub mod menus;
pub mod orders;
pub mod requests;
pub mod seller;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(requests::router())
        .merge(menus::router())
        .merge(buyer::router())
        .merge(seller::router())
        .merge(orders::router())
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
