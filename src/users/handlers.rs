use axum::{extract::State, routing::get, routing::post, Json, Router};
use tracing::instrument;

use super::dto::{FavoritesResponse, LikesResponse, ProfileResponse, ToggleRequest};
use super::services;
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/me/profile", get(profile))
        .route("/me/favorites", post(toggle_favorite))
        .route("/me/likes", post(toggle_like))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = services::profile(state.profiles.as_ref(), user_id).await?;
    Ok(Json(profile))
}

#[instrument(skip(state, body))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ToggleRequest>,
) -> Result<Json<FavoritesResponse>, AppError> {
    let favorites =
        services::toggle_favorite(state.profiles.as_ref(), user_id, &body.recipe_id).await?;
    Ok(Json(FavoritesResponse { favorites }))
}

#[instrument(skip(state, body))]
pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ToggleRequest>,
) -> Result<Json<LikesResponse>, AppError> {
    let liked_recipes =
        services::toggle_like(state.profiles.as_ref(), user_id, &body.recipe_id).await?;
    Ok(Json(LikesResponse { liked_recipes }))
}
