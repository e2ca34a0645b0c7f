//! Buyer API Handlers

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::{Order, Request, RequestRow};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerRequestsQuery {
    pub buyer_id: String,
}

/// GET /api/buyer/requests?buyerId=... - the buyer's "my requests" view,
/// most recently active first
pub async fn list_requests(
    State(state): State<ServerState>,
    Query(query): Query<BuyerRequestsQuery>,
) -> AppResult<Json<Vec<Request>>> {
    Ok(Json(
        state.lifecycle.list_buyer_requests(&query.buyer_id).await?,
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsQuery {
    pub request_id: String,
}

/// GET /api/buyer/rows?requestId=... - the slots of a request in order
pub async fn list_rows(
    State(state): State<ServerState>,
    Query(query): Query<RowsQuery>,
) -> AppResult<Json<Vec<RequestRow>>> {
    Ok(Json(state.offers.list_rows(&query.request_id).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyBody {
    pub request_id: String,
    pub row_index: i64,
    pub buyer_name: String,
    pub buyer_address: String,
}

/// POST /api/buyer/buy - atomic purchase of one slot
pub async fn buy(
    State(state): State<ServerState>,
    Json(body): Json<BuyBody>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state
        .purchases
        .buy(
            &body.request_id,
            body.row_index,
            &body.buyer_name,
            &body.buyer_address,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}
