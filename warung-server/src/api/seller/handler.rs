//! Seller API Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::RequestRow;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickBody {
    pub request_id: String,
    /// The seller's chosen menu; absent picks the top-ranked one
    #[serde(default)]
    pub menu_name: Option<String>,
}

/// POST /api/seller/pick - fill the first empty slot from the catalog,
/// with the seller's chosen menu or the best-ranked match
pub async fn pick(
    State(state): State<ServerState>,
    Json(body): Json<PickBody>,
) -> AppResult<(StatusCode, Json<RequestRow>)> {
    let row = state
        .offers
        .pick_and_fill_row(&body.request_id, body.menu_name.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRowBody {
    pub request_id: String,
    /// Absent: allocate the first empty slot
    #[serde(default)]
    pub row_index: Option<i64>,
    pub content: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub score: f64,
}

/// POST /api/seller/row - write a slot, allocated or explicit
pub async fn save_row(
    State(state): State<ServerState>,
    Json(body): Json<SaveRowBody>,
) -> AppResult<(StatusCode, Json<RequestRow>)> {
    let row = match body.row_index {
        Some(idx) => {
            state
                .offers
                .save_row(
                    &body.request_id,
                    idx,
                    &body.content,
                    &body.vendor,
                    body.price,
                    body.score,
                )
                .await?
        }
        None => {
            state
                .offers
                .fill_first_empty_row(
                    &body.request_id,
                    &body.content,
                    &body.vendor,
                    body.price,
                    body.score,
                )
                .await?
        }
    };
    Ok((StatusCode::CREATED, Json(row)))
}
