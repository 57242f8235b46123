use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewRecipe, Recipe, RecipeFilter, RecipePatch};

const RECIPE_COLUMNS: &str = "id, title, description, ingredients, instructions, cook_time, \
     servings, category, image, created_by, likes, created_at, updated_at";

/// Persistent collection of native recipes.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Filtered recipes, newest first.
    async fn find(&self, filter: &RecipeFilter) -> anyhow::Result<Vec<Recipe>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Recipe>>;
    /// Recipes whose id is in `ids`, newest first.
    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Recipe>>;
    async fn create(&self, recipe: NewRecipe) -> anyhow::Result<Recipe>;
    async fn update(&self, id: Uuid, patch: RecipePatch) -> anyhow::Result<Option<Recipe>>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgRecipeStore {
    db: PgPool,
}

impl PgRecipeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Escapes LIKE metacharacters so the term matches literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn find(&self, filter: &RecipeFilter) -> anyhow::Result<Vec<Recipe>> {
        let pattern = filter.search.as_deref().map(like_pattern);
        let sql = format!(
            r#"
            SELECT {RECIPE_COLUMNS}
            FROM recipes
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL
                   OR title ILIKE $2 ESCAPE '\'
                   OR description ILIKE $2 ESCAPE '\'
                   OR EXISTS (SELECT 1 FROM unnest(ingredients) AS ing
                              WHERE ing ILIKE $2 ESCAPE '\'))
            ORDER BY created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, Recipe>(&sql)
            .bind(filter.category.as_deref())
            .bind(pattern)
            .fetch_all(&self.db)
            .await
            .context("select recipes")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1");
        let row = sqlx::query_as::<_, Recipe>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("select recipe by id")?;
        Ok(row)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Recipe>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ANY($1) ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, Recipe>(&sql)
            .bind(ids)
            .fetch_all(&self.db)
            .await
            .context("select recipes by ids")?;
        Ok(rows)
    }

    async fn create(&self, r: NewRecipe) -> anyhow::Result<Recipe> {
        let sql = format!(
            r#"
            INSERT INTO recipes
                (title, description, ingredients, instructions, cook_time,
                 servings, category, image, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {RECIPE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Recipe>(&sql)
            .bind(r.title)
            .bind(r.description)
            .bind(r.ingredients)
            .bind(r.instructions)
            .bind(r.cook_time)
            .bind(r.servings)
            .bind(r.category)
            .bind(r.image)
            .bind(r.created_by)
            .fetch_one(&self.db)
            .await
            .context("insert recipe")?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, p: RecipePatch) -> anyhow::Result<Option<Recipe>> {
        let sql = format!(
            r#"
            UPDATE recipes SET
                title        = COALESCE($2, title),
                description  = COALESCE($3, description),
                ingredients  = COALESCE($4, ingredients),
                instructions = COALESCE($5, instructions),
                cook_time    = COALESCE($6, cook_time),
                servings     = COALESCE($7, servings),
                category     = COALESCE($8, category),
                image        = COALESCE($9, image),
                updated_at   = now()
            WHERE id = $1
            RETURNING {RECIPE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Recipe>(&sql)
            .bind(id)
            .bind(p.title)
            .bind(p.description)
            .bind(p.ingredients)
            .bind(p.instructions)
            .bind(p.cook_time)
            .bind(p.servings)
            .bind(p.category)
            .bind(p.image)
            .fetch_optional(&self.db)
            .await
            .context("update recipe")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete recipe")?;
        Ok(res.rows_affected() > 0)
    }
}
