//! Request API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::services::offer_slots::OfferDraft;
use crate::utils::{AppError, AppResult};
use shared::{Message, Offer, Request, SenderType};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub request_id: String,
    pub text: String,
    /// Present: open a conversation; absent: plain NEW intake
    #[serde(default)]
    pub buyer_id: Option<String>,
}

/// POST /api/requests - create a request, optionally with a conversation
pub async fn create(
    State(state): State<ServerState>,
    Json(body): Json<CreateRequestBody>,
) -> AppResult<(StatusCode, Json<Request>)> {
    let request = match &body.buyer_id {
        Some(buyer_id) => {
            let (request, _) = state
                .lifecycle
                .create_conversation(&body.request_id, buyer_id, &body.text)
                .await?;
            request
        }
        None => {
            state
                .lifecycle
                .create_request(&body.request_id, &body.text)
                .await?
        }
    };
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/requests/latest - claim one request for the calling seller.
/// 204 when nothing is waiting.
pub async fn claim_latest(State(state): State<ServerState>) -> AppResult<Response> {
    match state.lifecycle.claim_oldest_open().await? {
        Some(request) => Ok(Json(request).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// GET /api/requests/open - all non-terminal requests, newest first
pub async fn list_open(State(state): State<ServerState>) -> AppResult<Json<Vec<Request>>> {
    Ok(Json(state.lifecycle.open_requests().await?))
}

/// GET /api/requests/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Request>> {
    Ok(Json(state.lifecycle.get_request(&id).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteBody {
    #[serde(default)]
    pub selected_offer_id: Option<String>,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// POST /api/requests/:id/complete - finish a conversation-mode request
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<CompleteBody>,
) -> AppResult<Json<Request>> {
    let request = state
        .lifecycle
        .mark_completed(&id, body.selected_offer_id, body.buyer_name, body.address)
        .await?;
    Ok(Json(request))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    pub sender_type: SenderType,
    pub sender_id: String,
    pub text: String,
}

/// POST /api/requests/:id/messages
pub async fn send_message(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<SendMessageBody>,
) -> AppResult<(StatusCode, Json<Message>)> {
    let message = match body.sender_type {
        SenderType::Buyer => {
            state
                .lifecycle
                .send_buyer_message(&id, &body.sender_id, &body.text)
                .await?
        }
        SenderType::Seller => {
            state
                .lifecycle
                .send_seller_message(&id, &body.sender_id, &body.text)
                .await?
        }
    };
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/requests/:id/messages - full conversation, oldest first
pub async fn list_messages(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(state.lifecycle.conversation(&id).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOfferBody {
    pub seller_id: String,
    pub menu_name: String,
    pub price: i64,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub eta_minutes: i64,
    #[serde(default)]
    pub rating: f64,
}

/// POST /api/requests/:id/offers - answer the buyer's current question
pub async fn send_offer(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<SendOfferBody>,
) -> AppResult<(StatusCode, Json<Offer>)> {
    if !(0.0..=5.0).contains(&body.rating) {
        return Err(AppError::validation("rating must be within 0..5"));
    }
    let offer = state
        .offers
        .send_offer(
            &id,
            &body.seller_id,
            OfferDraft {
                menu_name: body.menu_name,
                price: body.price,
                vendor: body.vendor,
                eta_minutes: body.eta_minutes,
                rating: body.rating,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOffersQuery {
    #[serde(default)]
    pub buyer_message_id: Option<String>,
}

/// GET /api/requests/:id/offers - offers for one question, or all of them
pub async fn list_offers(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<ListOffersQuery>,
) -> AppResult<Json<Vec<Offer>>> {
    let offers = match query.buyer_message_id {
        Some(mid) => state.offers.list_offers(&id, &mid).await?,
        None => state.offers.list_all_offers(&id).await?,
    };
    Ok(Json(offers))
}
