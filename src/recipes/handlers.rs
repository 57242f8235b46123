use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::aggregator::browse;
use super::dto::{ListQuery, MessageResponse, RecipeRequest, RecipeView};
use super::services::{create_recipe, delete_recipe, get_recipe, update_recipe};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create))
        .route("/recipes/:id", get(get_one).put(update).delete(delete))
}

/// GET /recipes?category=&search=&ids=
/// Public; a bearer token only matters for the favorites/liked pseudo-categories.
#[instrument(skip(state, auth))]
pub async fn list_recipes(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<RecipeView>>, AppError> {
    let user = auth.map(|AuthUser(id)| id);
    let recipes = browse(
        state.recipes.as_ref(),
        state.provider.as_ref(),
        state.profiles.as_ref(),
        user,
        q,
    )
    .await?;
    Ok(Json(recipes))
}

#[instrument(skip(state))]
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeView>, AppError> {
    let recipe = get_recipe(state.recipes.as_ref(), state.provider.as_ref(), &id).await?;
    Ok(Json(recipe))
}

#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<RecipeRequest>,
) -> Result<(StatusCode, HeaderMap, Json<RecipeView>), AppError> {
    let recipe = create_recipe(state.recipes.as_ref(), user_id, body).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/recipes/{}", recipe.id).parse() {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(recipe)))
}

#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<RecipeRequest>,
) -> Result<Json<RecipeView>, AppError> {
    let recipe = update_recipe(state.recipes.as_ref(), user_id, &id, body).await?;
    Ok(Json(recipe))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    delete_recipe(state.recipes.as_ref(), user_id, &id).await?;
    Ok(Json(MessageResponse {
        message: "Recipe deleted",
    }))
}
