use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Native recipe record in the database.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub cook_time: String,
    pub servings: i32,
    pub category: String,
    pub image: Option<String>,
    pub created_by: Uuid,
    pub likes: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validated input for a new native recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub cook_time: String,
    pub servings: i32,
    pub category: String,
    pub image: Option<String>,
    pub created_by: Uuid,
}

/// Fields to overwrite on update; `None` leaves the column as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
    pub cook_time: Option<String>,
    pub servings: Option<i32>,
    pub category: Option<String>,
    pub image: Option<String>,
}

/// Local store query: optional category equality and free-text search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[cfg(test)]
impl Recipe {
    /// Case-insensitive substring match over title, description and
    /// ingredients, mirroring the SQL search.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
            || self
                .ingredients
                .iter()
                .any(|i| i.to_lowercase().contains(&term))
    }

    pub fn apply(&mut self, patch: RecipePatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.ingredients {
            self.ingredients = v;
        }
        if let Some(v) = patch.instructions {
            self.instructions = v;
        }
        if let Some(v) = patch.cook_time {
            self.cook_time = v;
        }
        if let Some(v) = patch.servings {
            self.servings = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.image {
            self.image = Some(v);
        }
    }
}
