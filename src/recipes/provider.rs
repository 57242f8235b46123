//! Client for the third-party meal lookup service (TheMealDB wire format).

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;

/// Number of numbered ingredient/measure pairs in a provider meal.
pub const INGREDIENT_SLOTS: usize = 20;

/// One meal as the provider sends it. Category filter results only carry
/// `idMeal`, `strMeal` and `strMealThumb`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealRecord {
    #[serde(rename = "idMeal")]
    pub id_meal: String,
    #[serde(rename = "strMeal", default)]
    pub name: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
    /// `strIngredientN` / `strMeasureN` and everything else we don't model.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl MealRecord {
    fn field(&self, key: &str) -> &str {
        self.extra
            .get(key)
            .and_then(serde_json::Value::as_str)
            .unwrap_or("")
    }

    /// `(measure, ingredient)` for every non-blank ingredient slot.
    pub fn ingredient_pairs(&self) -> Vec<(&str, &str)> {
        (1..=INGREDIENT_SLOTS)
            .filter_map(|i| {
                let ingredient = self.field(&format!("strIngredient{i}"));
                if ingredient.trim().is_empty() {
                    return None;
                }
                Some((self.field(&format!("strMeasure{i}")), ingredient))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct MealsEnvelope {
    meals: Option<Vec<MealRecord>>,
}

#[async_trait]
pub trait RecipeProvider: Send + Sync {
    /// Full meal by provider id; `Ok(None)` when the provider has no match.
    async fn lookup(&self, raw_id: &str) -> Result<Option<MealRecord>, ProviderError>;

    /// Full meals whose name matches `term`.
    async fn search(&self, term: &str) -> Result<Vec<MealRecord>, ProviderError>;

    /// Abbreviated meals in a provider category; details need a `lookup`.
    async fn filter_by_category(&self, category: &str) -> Result<Vec<MealRecord>, ProviderError>;
}

#[derive(Clone)]
pub struct MealDbClient {
    http: reqwest::Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_meals(
        &self,
        endpoint: &str,
        param: (&str, &str),
    ) -> Result<Vec<MealRecord>, ProviderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self.http.get(&url).query(&[param]).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let envelope: MealsEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        let meals = envelope.meals.unwrap_or_default();
        debug!(endpoint, count = meals.len(), "provider response");
        Ok(meals)
    }
}

#[async_trait]
impl RecipeProvider for MealDbClient {
    async fn lookup(&self, raw_id: &str) -> Result<Option<MealRecord>, ProviderError> {
        let meals = self.get_meals("lookup.php", ("i", raw_id)).await?;
        Ok(meals.into_iter().next())
    }

    async fn search(&self, term: &str) -> Result<Vec<MealRecord>, ProviderError> {
        self.get_meals("search.php", ("s", term)).await
    }

    async fn filter_by_category(&self, category: &str) -> Result<Vec<MealRecord>, ProviderError> {
        self.get_meals("filter.php", ("c", category)).await
    }
}
