//! Seller API module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/seller/pick", post(handler::pick))
        .route("/api/seller/row", post(handler::save_row))
}
