//! Request API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/requests", request_routes())
}

fn request_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/latest", get(handler::claim_latest))
        .route("/open", get(handler::list_open))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/complete", post(handler::complete))
        .route(
            "/{id}/messages",
            get(handler::list_messages).post(handler::send_message),
        )
        .route(
            "/{id}/offers",
            get(handler::list_offers).post(handler::send_offer),
        )
}
