use tracing::info;
use uuid::Uuid;

use super::dto::ProfileResponse;
use super::repo::{ProfileStore, RecipeSet};
use crate::error::AppError;
use crate::recipes::id::{InvalidRecipeId, RecipeId};

fn parse_recipe_id(raw: &str) -> Result<RecipeId, AppError> {
    raw.parse()
        .map_err(|e: InvalidRecipeId| AppError::Validation(e.to_string()))
}

pub async fn profile(
    profiles: &dyn ProfileStore,
    user_id: Uuid,
) -> Result<ProfileResponse, AppError> {
    let (favorites, liked) = tokio::join!(
        profiles.list(user_id, RecipeSet::Favorites),
        profiles.list(user_id, RecipeSet::Likes),
    );
    Ok(ProfileResponse {
        user_id,
        favorites: favorites.map_err(AppError::store("Error fetching profile"))?,
        liked_recipes: liked.map_err(AppError::store("Error fetching profile"))?,
    })
}

/// Adds or removes `raw_id` from the user's favorites.
pub async fn toggle_favorite(
    profiles: &dyn ProfileStore,
    user_id: Uuid,
    raw_id: &str,
) -> Result<Vec<RecipeId>, AppError> {
    let id = parse_recipe_id(raw_id)?;
    let toggled = profiles
        .toggle(user_id, RecipeSet::Favorites, &id)
        .await
        .map_err(AppError::store("Error toggling favorite"))?;
    info!(%user_id, recipe_id = %id, added = toggled.added, "favorite toggled");
    Ok(toggled.ids)
}

/// Adds or removes `raw_id` from the user's likes. Native recipes also
/// carry a like counter that the store moves with the toggle.
pub async fn toggle_like(
    profiles: &dyn ProfileStore,
    user_id: Uuid,
    raw_id: &str,
) -> Result<Vec<RecipeId>, AppError> {
    let id = parse_recipe_id(raw_id)?;
    let toggled = profiles
        .toggle(user_id, RecipeSet::Likes, &id)
        .await
        .map_err(AppError::store("Error toggling like"))?;

    info!(%user_id, added = toggled.added, "like toggled");
    Ok(toggled.ids)
}
