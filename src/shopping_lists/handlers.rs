use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::dto::{AddItemRequest, ItemPatch, ShoppingListView};
use super::services;
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn shopping_list_routes() -> Router<AppState> {
    Router::new()
        .route("/shopping-list", get(get_list))
        .route("/shopping-list/items", post(add_item))
        .route(
            "/shopping-list/items/:item_id",
            put(update_item).delete(delete_item),
        )
}

#[instrument(skip(state))]
pub async fn get_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ShoppingListView>, AppError> {
    Ok(Json(services::get_list(&state.db, user_id).await?))
}

#[instrument(skip(state, body))]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<ShoppingListView>, AppError> {
    Ok(Json(services::add_item(&state.db, user_id, body.item).await?))
}

#[instrument(skip(state, patch))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(item_id): Path<i64>,
    Json(patch): Json<ItemPatch>,
) -> Result<Json<ShoppingListView>, AppError> {
    Ok(Json(
        services::update_item(&state.db, user_id, item_id, patch).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(item_id): Path<i64>,
) -> Result<Json<ShoppingListView>, AppError> {
    Ok(Json(
        services::delete_item(&state.db, user_id, item_id).await?,
    ))
}
