//! Merges native recipes with provider meals for one listing request.

use tracing::{debug, warn};
use uuid::Uuid;

use super::category::{Category, CategoryFilter, PseudoCategory};
use super::dto::{ListQuery, RecipeView};
use super::fanout::collect_ok;
use super::id::{self, RecipeId};
use super::normalize::normalize_meal;
use super::provider::{MealRecord, RecipeProvider};
use super::repo::RecipeStore;
use super::repo_types::RecipeFilter;
use crate::error::{AppError, ProviderError};
use crate::users::repo::{ProfileStore, RecipeSet};

/// Search used when neither a search term nor a mapped category narrows the
/// provider query.
pub const FALLBACK_SEARCH_TERM: &str = "Chicken";

/// Category candidates that get a detail lookup.
pub const CATEGORY_DETAIL_LIMIT: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub enum RecipeQuery {
    /// Exactly these recipes; category and search are ignored.
    ByIds(Vec<RecipeId>),
    Filtered {
        category: Option<Category>,
        search: Option<String>,
    },
}

/// Entry point for `GET /recipes`: parses the query, resolves
/// pseudo-categories for `user`, then lists.
pub async fn browse(
    store: &dyn RecipeStore,
    provider: &dyn RecipeProvider,
    profiles: &dyn ProfileStore,
    user: Option<Uuid>,
    q: ListQuery,
) -> Result<Vec<RecipeView>, AppError> {
    let category = CategoryFilter::parse(q.category.as_deref());

    let explicit_ids = q.ids.as_deref().map(|raw| {
        let (ids, rejected) = id::parse_id_list(raw);
        if !rejected.is_empty() {
            warn!(?rejected, "ignoring unparseable recipe ids");
        }
        ids
    });

    let query = match (explicit_ids, category) {
        (Some(ids), _) if !ids.is_empty() => RecipeQuery::ByIds(ids),
        (_, CategoryFilter::Pseudo(pseudo)) => {
            let ids = pseudo_category_ids(profiles, user, pseudo).await?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            RecipeQuery::ByIds(ids)
        }
        _ => RecipeQuery::Filtered {
            category: category.category(),
            search: q
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        },
    };

    list_recipes(store, provider, &query).await
}

async fn pseudo_category_ids(
    profiles: &dyn ProfileStore,
    user: Option<Uuid>,
    pseudo: PseudoCategory,
) -> Result<Vec<RecipeId>, AppError> {
    let Some(user_id) = user else {
        debug!(?pseudo, "pseudo-category without a user");
        return Ok(Vec::new());
    };
    let set = match pseudo {
        PseudoCategory::Favorites => RecipeSet::Favorites,
        PseudoCategory::LikedRecipes => RecipeSet::Likes,
    };
    profiles
        .list(user_id, set)
        .await
        .map_err(AppError::store("Error fetching profile"))
}

/// Native results first, then provider results. Only a failing local store
/// surfaces as an error; provider trouble shrinks the external part.
pub async fn list_recipes(
    store: &dyn RecipeStore,
    provider: &dyn RecipeProvider,
    query: &RecipeQuery,
) -> Result<Vec<RecipeView>, AppError> {
    let (local, external) = match query {
        RecipeQuery::ByIds(ids) => {
            let (native, external) = id::partition(ids);
            let (local, meals) = tokio::join!(
                store.find_by_ids(&native),
                collect_ok(external.iter(), |raw| lookup_meal(provider, raw)),
            );
            (local, normalize_all(meals))
        }
        RecipeQuery::Filtered { category, search } => {
            let filter = RecipeFilter {
                category: category.map(|c| c.as_str().to_string()),
                search: search.clone(),
            };
            tokio::join!(
                store.find(&filter),
                external_recipes(provider, *category, search.as_deref()),
            )
        }
    };

    let local = local.map_err(AppError::store("Error fetching recipes"))?;
    debug!(local = local.len(), external = external.len(), "recipes merged");
    Ok(local
        .into_iter()
        .map(RecipeView::from)
        .chain(external)
        .collect())
}

/// A lookup only counts when the provider actually returns a meal.
pub(crate) async fn lookup_meal(
    provider: &dyn RecipeProvider,
    raw_id: &str,
) -> Result<MealRecord, ProviderError> {
    provider
        .lookup(raw_id)
        .await?
        .ok_or_else(|| ProviderError::Missing(raw_id.to_string()))
}

pub(crate) fn normalize_all(meals: Vec<MealRecord>) -> Vec<RecipeView> {
    let mut rng = rand::thread_rng();
    meals
        .into_iter()
        .map(|m| normalize_meal(m, &mut rng))
        .collect()
}

async fn external_recipes(
    provider: &dyn RecipeProvider,
    category: Option<Category>,
    search: Option<&str>,
) -> Vec<RecipeView> {
    let (meals, precise) = match fetch_external(provider, category, search).await {
        Ok(fetched) => fetched,
        Err(e) => {
            warn!(error = %e, "external recipes unavailable");
            return Vec::new();
        }
    };

    let views = normalize_all(meals);
    match category {
        Some(c) if !precise => views
            .into_iter()
            .filter(|v| c.accepts_external(&v.category))
            .collect(),
        _ => views,
    }
}

/// Returns the meals and whether they already came from a specific
/// provider category.
async fn fetch_external(
    provider: &dyn RecipeProvider,
    category: Option<Category>,
    search: Option<&str>,
) -> Result<(Vec<MealRecord>, bool), ProviderError> {
    if let Some(term) = search {
        return Ok((provider.search(term).await?, false));
    }

    if let Some(provider_category) = category.and_then(Category::provider_category) {
        let stubs = provider.filter_by_category(provider_category).await?;
        let meals = collect_ok(
            stubs.into_iter().take(CATEGORY_DETAIL_LIMIT),
            |stub| async move { lookup_meal(provider, &stub.id_meal).await },
        )
        .await;
        return Ok((meals, true));
    }

    Ok((provider.search(FALLBACK_SEARCH_TERM).await?, false))
}
