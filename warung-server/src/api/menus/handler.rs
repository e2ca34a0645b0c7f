//! Menu API Handlers

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::MenuItem;

#[derive(Deserialize)]
pub struct ListMenusQuery {
    #[serde(default)]
    pub category: Option<String>,
}

/// GET /api/menus?category=... - ranked available menus for a category,
/// or the whole catalog without the filter
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListMenusQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let menus = match query.category {
        Some(category) => state.catalog.find_available(&category).await?,
        None => state.catalog.list_all().await?,
    };
    Ok(Json(menus))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuBody {
    pub name: String,
    pub price: i64,
    pub seller_id: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub eta_minutes: i64,
    #[serde(default)]
    pub rating: f64,
    pub category: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// POST /api/menus
pub async fn create(
    State(state): State<ServerState>,
    Json(body): Json<CreateMenuBody>,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    let menu = state
        .catalog
        .create_menu(
            &body.name,
            body.price,
            &body.seller_id,
            &body.vendor,
            body.eta_minutes,
            body.rating,
            &body.category,
            body.available,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(menu)))
}
