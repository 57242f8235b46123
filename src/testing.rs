//! In-memory stand-ins for the stores and the meal provider.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::error::ProviderError;
use crate::recipes::id::RecipeId;
use crate::recipes::provider::{MealRecord, RecipeProvider};
use crate::recipes::repo::RecipeStore;
use crate::recipes::repo_types::{NewRecipe, Recipe, RecipeFilter, RecipePatch};
use crate::users::repo::{ProfileStore, RecipeSet, Toggled};

/// Native recipe created `age_minutes` ago.
pub fn recipe(owner: Uuid, title: &str, category: &str, age_minutes: i64) -> Recipe {
    let at = OffsetDateTime::UNIX_EPOCH + Duration::days(20_000) - Duration::minutes(age_minutes);
    Recipe {
        id: Uuid::new_v4(),
        title: title.into(),
        description: format!("{title} description"),
        ingredients: vec!["Salt".into()],
        instructions: "Cook it".into(),
        cook_time: "30 mins".into(),
        servings: 2,
        category: category.into(),
        image: None,
        created_by: owner,
        likes: 0,
        created_at: at,
        updated_at: at,
    }
}

/// Full provider meal.
pub fn meal(id: &str, name: &str, category: &str) -> MealRecord {
    serde_json::from_value(json!({
        "idMeal": id,
        "strMeal": name,
        "strCategory": category,
        "strInstructions": format!("Make {name}."),
        "strMealThumb": format!("https://img/{id}.jpg"),
        "strIngredient1": "Eggs",
        "strMeasure1": "2",
    }))
    .expect("meal fixture")
}

/// Abbreviated meal as returned by the category filter.
pub fn stub(id: &str) -> MealRecord {
    serde_json::from_value(json!({ "idMeal": id, "strMeal": format!("Meal {id}") }))
        .expect("stub fixture")
}

#[derive(Default)]
pub struct InMemoryRecipeStore {
    pub recipes: Mutex<Vec<Recipe>>,
    pub fail: AtomicBool,
}

impl InMemoryRecipeStore {
    /// Moves the like counter by `delta`, never below zero.
    pub fn adjust_likes(&self, id: Uuid, delta: i32) -> anyhow::Result<()> {
        self.check()?;
        if let Some(r) = self.recipes.lock().unwrap().iter_mut().find(|r| r.id == id) {
            r.likes = (r.likes + delta).max(0);
        }
        Ok(())
    }

    pub fn with(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Mutex::new(recipes),
            fail: AtomicBool::new(false),
        }
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.fail.store(true, Ordering::SeqCst);
        store
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("store offline");
        }
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> Option<Recipe> {
        self.recipes.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }
}

fn newest_first(mut rows: Vec<Recipe>) -> Vec<Recipe> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn find(&self, filter: &RecipeFilter) -> anyhow::Result<Vec<Recipe>> {
        self.check()?;
        let rows = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.category.as_deref().map_or(true, |c| r.category == c))
            .filter(|r| filter.search.as_deref().map_or(true, |s| r.matches_search(s)))
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        self.check()?;
        Ok(self.get(id))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Recipe>> {
        self.check()?;
        let rows = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn create(&self, r: NewRecipe) -> anyhow::Result<Recipe> {
        self.check()?;
        let now = OffsetDateTime::now_utc();
        let row = Recipe {
            id: Uuid::new_v4(),
            title: r.title,
            description: r.description,
            ingredients: r.ingredients,
            instructions: r.instructions,
            cook_time: r.cook_time,
            servings: r.servings,
            category: r.category,
            image: r.image,
            created_by: r.created_by,
            likes: 0,
            created_at: now,
            updated_at: now,
        };
        self.recipes.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: RecipePatch) -> anyhow::Result<Option<Recipe>> {
        self.check()?;
        let mut rows = self.recipes.lock().unwrap();
        Ok(rows.iter_mut().find(|r| r.id == id).map(|r| {
            r.apply(patch);
            r.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        self.check()?;
        let mut rows = self.recipes.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }
}

/// Provider stub with canned responses and a call log.
#[derive(Default)]
pub struct ScriptedProvider {
    pub meals: HashMap<String, MealRecord>,
    pub failing_lookups: HashSet<String>,
    pub search_results: Vec<MealRecord>,
    pub category_stubs: HashMap<String, Vec<MealRecord>>,
    pub down: bool,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn with_meals(meals: impl IntoIterator<Item = MealRecord>) -> Self {
        Self {
            meals: meals.into_iter().map(|m| (m.id_meal.clone(), m)).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(call);
        if self.down {
            return Err(ProviderError::Status(503));
        }
        Ok(())
    }
}

#[async_trait]
impl RecipeProvider for ScriptedProvider {
    async fn lookup(&self, raw_id: &str) -> Result<Option<MealRecord>, ProviderError> {
        self.record(format!("lookup:{raw_id}"))?;
        if self.failing_lookups.contains(raw_id) {
            return Err(ProviderError::Status(500));
        }
        Ok(self.meals.get(raw_id).cloned())
    }

    async fn search(&self, term: &str) -> Result<Vec<MealRecord>, ProviderError> {
        self.record(format!("search:{term}"))?;
        Ok(self.search_results.clone())
    }

    async fn filter_by_category(&self, category: &str) -> Result<Vec<MealRecord>, ProviderError> {
        self.record(format!("filter:{category}"))?;
        Ok(self.category_stubs.get(category).cloned().unwrap_or_default())
    }
}

/// Profile sets. When linked to a recipe store, like toggles move its
/// counters and a counter failure leaves the sets untouched.
#[derive(Default)]
pub struct InMemoryProfileStore {
    pub sets: Mutex<HashMap<(Uuid, RecipeSet), Vec<RecipeId>>>,
    pub recipes: Option<Arc<InMemoryRecipeStore>>,
}

impl InMemoryProfileStore {
    pub fn linked(recipes: Arc<InMemoryRecipeStore>) -> Self {
        Self {
            recipes: Some(recipes),
            ..Default::default()
        }
    }

    pub fn seed(&self, user_id: Uuid, set: RecipeSet, ids: Vec<RecipeId>) {
        self.sets.lock().unwrap().insert((user_id, set), ids);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn list(&self, user_id: Uuid, set: RecipeSet) -> anyhow::Result<Vec<RecipeId>> {
        Ok(self
            .sets
            .lock()
            .unwrap()
            .get(&(user_id, set))
            .cloned()
            .unwrap_or_default())
    }

    async fn toggle(
        &self,
        user_id: Uuid,
        set: RecipeSet,
        id: &RecipeId,
    ) -> anyhow::Result<Toggled> {
        let mut sets = self.sets.lock().unwrap();
        let ids = sets.entry((user_id, set)).or_default();
        if let (RecipeSet::Likes, RecipeId::Native(recipe_id), Some(recipes)) =
            (set, id, &self.recipes)
        {
            let delta = if ids.contains(id) { -1 } else { 1 };
            recipes.adjust_likes(*recipe_id, delta)?;
        }
        let added = match ids.iter().position(|x| x == id) {
            Some(pos) => {
                ids.remove(pos);
                false
            }
            None => {
                ids.push(id.clone());
                true
            }
        };
        Ok(Toggled {
            added,
            ids: ids.clone(),
        })
    }
}
