use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::recipes::id::RecipeId;

/// The two per-user recipe sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeSet {
    Favorites,
    Likes,
}

impl RecipeSet {
    fn table(self) -> &'static str {
        match self {
            RecipeSet::Favorites => "user_favorites",
            RecipeSet::Likes => "user_likes",
        }
    }
}

/// Outcome of a membership toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct Toggled {
    /// `true` when the id was added, `false` when it was removed.
    pub added: bool,
    pub ids: Vec<RecipeId>,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Members of `set` in insertion order. Unknown users have empty sets.
    async fn list(&self, user_id: Uuid, set: RecipeSet) -> anyhow::Result<Vec<RecipeId>>;
    /// Adds or removes `id`. Toggling a like on a native recipe also moves its
    /// like counter, floored at zero, in the same transaction.
    async fn toggle(&self, user_id: Uuid, set: RecipeSet, id: &RecipeId)
        -> anyhow::Result<Toggled>;
}

#[derive(Clone)]
pub struct PgProfileStore {
    db: PgPool,
}

impl PgProfileStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn parse_refs(rows: Vec<String>) -> Vec<RecipeId> {
    rows.into_iter()
        .filter_map(|raw| match raw.parse() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "skipping stored recipe reference");
                None
            }
        })
        .collect()
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn list(&self, user_id: Uuid, set: RecipeSet) -> anyhow::Result<Vec<RecipeId>> {
        let sql = format!(
            "SELECT recipe_ref FROM {} WHERE user_id = $1 ORDER BY created_at, recipe_ref",
            set.table()
        );
        let rows: Vec<String> = sqlx::query_scalar(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await
            .with_context(|| format!("list {}", set.table()))?;
        Ok(parse_refs(rows))
    }

    async fn toggle(
        &self,
        user_id: Uuid,
        set: RecipeSet,
        id: &RecipeId,
    ) -> anyhow::Result<Toggled> {
        let table = set.table();
        let recipe_ref = id.to_string();
        let mut tx = self.db.begin().await.context("begin tx")?;

        let removed = sqlx::query(&format!(
            "DELETE FROM {table} WHERE user_id = $1 AND recipe_ref = $2"
        ))
        .bind(user_id)
        .bind(&recipe_ref)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("delete from {table}"))?
        .rows_affected()
            > 0;

        if !removed {
            sqlx::query(&format!(
                "INSERT INTO {table} (user_id, recipe_ref) VALUES ($1, $2) ON CONFLICT DO NOTHING"
            ))
            .bind(user_id)
            .bind(&recipe_ref)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("insert into {table}"))?;
        }

        if let (RecipeSet::Likes, RecipeId::Native(recipe_id)) = (set, id) {
            let delta: i32 = if removed { -1 } else { 1 };
            sqlx::query("UPDATE recipes SET likes = GREATEST(likes + $2, 0) WHERE id = $1")
                .bind(*recipe_id)
                .bind(delta)
                .execute(&mut *tx)
                .await
                .context("adjust recipe likes")?;
        }

        let rows: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT recipe_ref FROM {table} WHERE user_id = $1 ORDER BY created_at, recipe_ref"
        ))
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await
        .with_context(|| format!("list {table}"))?;

        tx.commit().await.context("commit tx")?;

        Ok(Toggled {
            added: !removed,
            ids: parse_refs(rows),
        })
    }
}
