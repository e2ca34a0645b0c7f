//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::Order;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    pub request_id: String,
    #[serde(default)]
    pub row_index: i64,
    pub menu: String,
    #[serde(default)]
    pub vendor: String,
    pub price: i64,
    #[serde(default)]
    pub buyer_name: String,
    #[serde(default)]
    pub buyer_address: String,
}

/// POST /api/orders - standalone order intake (status NEW_ORDER)
pub async fn create(
    State(state): State<ServerState>,
    Json(body): Json<CreateOrderBody>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state
        .purchases
        .create_order(
            &body.request_id,
            body.row_index,
            &body.menu,
            &body.vendor,
            body.price,
            &body.buyer_name,
            &body.buyer_address,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.purchases.get_order(&id).await?))
}
