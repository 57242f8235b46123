use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::id::RecipeId;
use super::repo_types::Recipe;

/// Recipe as returned to clients, native or external.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub cook_time: String,
    pub servings: i32,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<i32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub updated_at: Option<OffsetDateTime>,
    pub is_external: bool,
}

impl From<Recipe> for RecipeView {
    fn from(r: Recipe) -> Self {
        Self {
            id: RecipeId::Native(r.id),
            title: r.title,
            description: r.description,
            ingredients: r.ingredients,
            instructions: r.instructions,
            cook_time: r.cook_time,
            servings: r.servings,
            category: r.category,
            image: r.image,
            created_by: Some(r.created_by),
            rating: None,
            likes: Some(r.likes),
            created_at: Some(r.created_at),
            updated_at: Some(r.updated_at),
            is_external: false,
        }
    }
}

/// `GET /recipes` query string. `ids` is comma separated.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub ids: Option<String>,
}

/// Ingredients may be sent as one string or a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IngredientsInput {
    One(String),
    Many(Vec<String>),
}

impl IngredientsInput {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            IngredientsInput::One(s) => vec![s],
            IngredientsInput::Many(v) => v,
        }
    }
}

/// Body of `POST /recipes` and `PUT /recipes/:id`. Everything is optional at
/// the wire level; create checks required fields itself.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<IngredientsInput>,
    pub instructions: Option<String>,
    pub cook_time: Option<String>,
    pub servings: Option<i32>,
    pub category: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
