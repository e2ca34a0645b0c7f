//! Buyer API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/buyer/requests", get(handler::list_requests))
        .route("/api/buyer/rows", get(handler::list_rows))
        .route("/api/buyer/buy", post(handler::buy))
}
