use tracing::{info, warn};
use uuid::Uuid;

use super::aggregator::normalize_all;
use super::dto::{IngredientsInput, RecipeRequest, RecipeView};
use super::id::RecipeId;
use super::provider::RecipeProvider;
use super::repo::RecipeStore;
use super::repo_types::{NewRecipe, Recipe, RecipePatch};
use crate::error::AppError;

/// Resolves an identifier from either namespace to a single recipe.
pub async fn get_recipe(
    store: &dyn RecipeStore,
    provider: &dyn RecipeProvider,
    raw_id: &str,
) -> Result<RecipeView, AppError> {
    let id: RecipeId = raw_id.parse().map_err(|_| AppError::NotFound("Recipe"))?;
    match id {
        RecipeId::External(raw) => match provider.lookup(&raw).await {
            Ok(Some(meal)) => normalize_all(vec![meal])
                .pop()
                .ok_or(AppError::NotFound("Recipe")),
            Ok(None) => Err(AppError::NotFound("Recipe")),
            Err(e) => {
                warn!(error = %e, provider_id = %raw, "provider lookup failed");
                Err(AppError::ProviderUnavailable(e))
            }
        },
        RecipeId::Native(id) => store
            .find_by_id(id)
            .await
            .map_err(AppError::store("Error fetching recipe"))?
            .map(RecipeView::from)
            .ok_or(AppError::NotFound("Recipe")),
    }
}

pub async fn create_recipe(
    store: &dyn RecipeStore,
    user_id: Uuid,
    body: RecipeRequest,
) -> Result<RecipeView, AppError> {
    let recipe = new_recipe(body, user_id)
        .map_err(|msg| AppError::Validation(format!("Error creating recipe: {msg}")))?;
    let row = store
        .create(recipe)
        .await
        .map_err(AppError::store("Error creating recipe"))?;
    info!(recipe_id = %row.id, %user_id, "recipe created");
    Ok(row.into())
}

pub async fn update_recipe(
    store: &dyn RecipeStore,
    user_id: Uuid,
    raw_id: &str,
    body: RecipeRequest,
) -> Result<RecipeView, AppError> {
    let existing = load_owned(store, user_id, raw_id, "Error updating recipe").await?;
    let patch = recipe_patch(body)
        .map_err(|msg| AppError::Validation(format!("Error updating recipe: {msg}")))?;
    let row = store
        .update(existing.id, patch)
        .await
        .map_err(AppError::store("Error updating recipe"))?
        .ok_or(AppError::NotFound("Recipe"))?;
    info!(recipe_id = %row.id, %user_id, "recipe updated");
    Ok(row.into())
}

pub async fn delete_recipe(
    store: &dyn RecipeStore,
    user_id: Uuid,
    raw_id: &str,
) -> Result<(), AppError> {
    let existing = load_owned(store, user_id, raw_id, "Error deleting recipe").await?;
    let removed = store
        .delete(existing.id)
        .await
        .map_err(AppError::store("Error deleting recipe"))?;
    if !removed {
        return Err(AppError::NotFound("Recipe"));
    }
    info!(recipe_id = %existing.id, %user_id, "recipe deleted");
    Ok(())
}

/// Loads a native recipe and checks that `user_id` owns it. Runs before any
/// payload validation.
async fn load_owned(
    store: &dyn RecipeStore,
    user_id: Uuid,
    raw_id: &str,
    context: &'static str,
) -> Result<Recipe, AppError> {
    // provider recipes are never stored, so they are never found here
    let Ok(RecipeId::Native(id)) = raw_id.parse::<RecipeId>() else {
        return Err(AppError::NotFound("Recipe"));
    };
    let recipe = store
        .find_by_id(id)
        .await
        .map_err(AppError::store(context))?
        .ok_or(AppError::NotFound("Recipe"))?;
    if recipe.created_by != user_id {
        warn!(recipe_id = %id, %user_id, owner = %recipe.created_by, "non-owner mutation");
        return Err(AppError::Forbidden);
    }
    Ok(recipe)
}

fn present(value: Option<String>, field: &str) -> Result<Option<String>, String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if v.is_empty() => Err(format!("{field} must not be empty")),
        other => Ok(other),
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    present(value, field)?.ok_or_else(|| format!("{field} is required"))
}

fn ingredients(input: IngredientsInput) -> Result<Vec<String>, String> {
    let list: Vec<String> = input
        .into_vec()
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    if list.is_empty() {
        return Err("ingredients must not be empty".into());
    }
    Ok(list)
}

fn servings(value: i32) -> Result<i32, String> {
    if value <= 0 {
        return Err("servings must be positive".into());
    }
    Ok(value)
}

fn image(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn new_recipe(body: RecipeRequest, created_by: Uuid) -> Result<NewRecipe, String> {
    Ok(NewRecipe {
        title: required(body.title, "title")?,
        description: required(body.description, "description")?,
        ingredients: ingredients(body.ingredients.ok_or("ingredients is required")?)?,
        instructions: required(body.instructions, "instructions")?,
        cook_time: required(body.cook_time, "cookTime")?,
        servings: servings(body.servings.ok_or("servings is required")?)?,
        category: required(body.category, "category")?.to_lowercase(),
        image: image(body.image),
        created_by,
    })
}

fn recipe_patch(body: RecipeRequest) -> Result<RecipePatch, String> {
    Ok(RecipePatch {
        title: present(body.title, "title")?,
        description: present(body.description, "description")?,
        ingredients: body.ingredients.map(ingredients).transpose()?,
        instructions: present(body.instructions, "instructions")?,
        cook_time: present(body.cook_time, "cookTime")?,
        servings: body.servings.map(servings).transpose()?,
        category: present(body.category, "category")?.map(|c| c.to_lowercase()),
        image: image(body.image),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{meal, recipe, InMemoryRecipeStore, ScriptedProvider};

    fn full_body() -> RecipeRequest {
        RecipeRequest {
            title: Some("Salted water".into()),
            description: Some("Basic".into()),
            ingredients: Some(IngredientsInput::One("Salt".into())),
            instructions: Some("Dissolve".into()),
            cook_time: Some("5 mins".into()),
            servings: Some(1),
            category: Some("Snacks".into()),
            image: None,
        }
    }

    #[tokio::test]
    async fn create_wraps_scalar_ingredient() {
        let store = InMemoryRecipeStore::default();
        let owner = Uuid::new_v4();
        let view = create_recipe(&store, owner, full_body()).await.unwrap();

        let RecipeId::Native(id) = view.id else {
            panic!("expected native id");
        };
        let stored = store.get(id).unwrap();
        assert_eq!(stored.ingredients, vec!["Salt".to_string()]);
        assert_eq!(stored.created_by, owner);
        assert_eq!(stored.category, "snacks");
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let store = InMemoryRecipeStore::default();
        let body = RecipeRequest {
            title: None,
            ..full_body()
        };
        let err = create_recipe(&store, Uuid::new_v4(), body).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Error creating recipe: title is required");
        assert!(store.recipes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_owner_is_forbidden_regardless_of_payload() {
        let owner = Uuid::new_v4();
        let row = recipe(owner, "Mine", "lunch", 1);
        let id = row.id.to_string();
        let store = InMemoryRecipeStore::with(vec![row]);
        let intruder = Uuid::new_v4();

        let invalid = RecipeRequest {
            title: Some("   ".into()),
            servings: Some(-3),
            ..Default::default()
        };
        for body in [invalid, full_body()] {
            let err = update_recipe(&store, intruder, &id, body).await.unwrap_err();
            assert!(matches!(err, AppError::Forbidden));
        }
        let err = delete_recipe(&store, intruder, &id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        assert_eq!(store.recipes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn owner_update_applies_present_fields_only() {
        let owner = Uuid::new_v4();
        let row = recipe(owner, "Soup", "lunch", 1);
        let id = row.id;
        let store = InMemoryRecipeStore::with(vec![row]);

        let body = RecipeRequest {
            ingredients: Some(IngredientsInput::One("Leek".into())),
            servings: Some(6),
            ..Default::default()
        };
        let view = update_recipe(&store, owner, &id.to_string(), body).await.unwrap();

        assert_eq!(view.title, "Soup");
        assert_eq!(view.ingredients, vec!["Leek".to_string()]);
        assert_eq!(view.servings, 6);
    }

    #[tokio::test]
    async fn owner_delete_removes_record() {
        let owner = Uuid::new_v4();
        let row = recipe(owner, "Soup", "lunch", 1);
        let id = row.id.to_string();
        let store = InMemoryRecipeStore::with(vec![row]);

        delete_recipe(&store, owner, &id).await.unwrap();
        assert!(store.recipes.lock().unwrap().is_empty());

        let err = delete_recipe(&store, owner, &id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn external_ids_cannot_be_mutated() {
        let store = InMemoryRecipeStore::default();
        let err = update_recipe(&store, Uuid::new_v4(), "ext-52771", full_body())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_resolves_both_namespaces() {
        let owner = Uuid::new_v4();
        let row = recipe(owner, "Soup", "lunch", 1);
        let id = row.id;
        let store = InMemoryRecipeStore::with(vec![row]);
        let provider = ScriptedProvider::with_meals([meal("52771", "Penne", "Vegetarian")]);

        let native = get_recipe(&store, &provider, &id.to_string()).await.unwrap();
        assert_eq!(native.title, "Soup");

        let external = get_recipe(&store, &provider, "ext-52771").await.unwrap();
        assert!(external.is_external);
        assert_eq!(external.category, "vegetarian");

        let err = get_recipe(&store, &provider, "ext-1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = get_recipe(&store, &provider, &Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_external_surfaces_provider_failure() {
        let store = InMemoryRecipeStore::default();
        let provider = ScriptedProvider {
            down: true,
            ..Default::default()
        };
        let err = get_recipe(&store, &provider, "ext-52771").await.unwrap_err();
        assert!(matches!(err, AppError::ProviderUnavailable(_)));
    }
}
