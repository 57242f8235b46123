use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recipes::id::RecipeId;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub favorites: Vec<RecipeId>,
    pub liked_recipes: Vec<RecipeId>,
}

/// Body of the favorite/like toggles. Kept as a string so a bad id is a 400
/// with a message rather than an extractor rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub recipe_id: String,
}

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<RecipeId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesResponse {
    pub liked_recipes: Vec<RecipeId>,
}
