use anyhow::Context;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::dto::{ItemPatch, NewItem, ShoppingItem, ShoppingListView};
use super::repo;
use crate::error::AppError;

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("{field} is required")),
    }
}

/// One past the highest id, or the lowest free positive id once the highest
/// is `i64::MAX`.
fn next_id(items: &[ShoppingItem]) -> i64 {
    let Some(max) = items.iter().map(|i| i.id).max() else {
        return 1;
    };
    max.checked_add(1).unwrap_or_else(|| {
        let mut taken: Vec<i64> = items.iter().map(|i| i.id).filter(|id| *id > 0).collect();
        taken.sort_unstable();
        taken.dedup();
        let mut candidate = 1;
        for id in taken {
            if id != candidate {
                break;
            }
            candidate += 1;
        }
        candidate
    })
}

/// Builds the stored item, keeping the client id unless it is taken.
fn new_item(items: &[ShoppingItem], item: NewItem) -> Result<ShoppingItem, String> {
    let id = match item.id {
        Some(id) if !items.iter().any(|i| i.id == id) => id,
        _ => next_id(items),
    };
    Ok(ShoppingItem {
        id,
        name: required(item.name, "name")?,
        category: required(item.category, "category")?,
        quantity: required(item.quantity, "quantity")?,
        completed: item.completed,
        priority: item.priority,
    })
}

fn apply_patch(item: &mut ShoppingItem, patch: ItemPatch) {
    if let Some(name) = patch.name {
        item.name = name;
    }
    if let Some(quantity) = patch.quantity {
        item.quantity = quantity;
    }
    if let Some(category) = patch.category {
        item.category = category;
    }
    if let Some(priority) = patch.priority {
        item.priority = priority;
    }
    if let Some(completed) = patch.completed {
        item.completed = completed;
    }
}

pub async fn get_list(db: &PgPool, user_id: Uuid) -> Result<ShoppingListView, AppError> {
    let row = repo::get_or_create(db, user_id)
        .await
        .map_err(AppError::store("Error fetching shopping list"))?;
    Ok(row.into())
}

pub async fn add_item(
    db: &PgPool,
    user_id: Uuid,
    item: NewItem,
) -> Result<ShoppingListView, AppError> {
    let ctx = "Error adding item";
    let mut tx = db
        .begin()
        .await
        .context("begin tx")
        .map_err(AppError::store(ctx))?;
    repo::ensure_tx(&mut tx, user_id)
        .await
        .map_err(AppError::store(ctx))?;
    let list = repo::lock_tx(&mut tx, user_id)
        .await
        .map_err(AppError::store(ctx))?
        .ok_or(AppError::NotFound("Shopping list"))?;

    let mut items = list.items.0;
    let item = new_item(&items, item)
        .map_err(|msg| AppError::Validation(format!("Error adding item: {msg}")))?;
    let item_id = item.id;
    items.push(item);

    let row = repo::save_items_tx(&mut tx, list.id, &items)
        .await
        .map_err(AppError::store(ctx))?;
    tx.commit()
        .await
        .context("commit tx")
        .map_err(AppError::store(ctx))?;

    info!(%user_id, item_id, "shopping item added");
    Ok(row.into())
}

pub async fn update_item(
    db: &PgPool,
    user_id: Uuid,
    item_id: i64,
    patch: ItemPatch,
) -> Result<ShoppingListView, AppError> {
    let ctx = "Error updating item";
    let mut tx = db
        .begin()
        .await
        .context("begin tx")
        .map_err(AppError::store(ctx))?;
    let list = repo::lock_tx(&mut tx, user_id)
        .await
        .map_err(AppError::store(ctx))?
        .ok_or(AppError::NotFound("Shopping list"))?;

    let mut items = list.items.0;
    let item = items
        .iter_mut()
        .find(|i| i.id == item_id)
        .ok_or(AppError::NotFound("Item"))?;
    apply_patch(item, patch);

    let row = repo::save_items_tx(&mut tx, list.id, &items)
        .await
        .map_err(AppError::store(ctx))?;
    tx.commit()
        .await
        .context("commit tx")
        .map_err(AppError::store(ctx))?;
    Ok(row.into())
}

/// Removes every item with `item_id`. An unknown item leaves the list as is.
pub async fn delete_item(
    db: &PgPool,
    user_id: Uuid,
    item_id: i64,
) -> Result<ShoppingListView, AppError> {
    let ctx = "Error deleting item";
    let mut tx = db
        .begin()
        .await
        .context("begin tx")
        .map_err(AppError::store(ctx))?;
    let list = repo::lock_tx(&mut tx, user_id)
        .await
        .map_err(AppError::store(ctx))?
        .ok_or(AppError::NotFound("Shopping list"))?;

    let mut items = list.items.0;
    items.retain(|i| i.id != item_id);

    let row = repo::save_items_tx(&mut tx, list.id, &items)
        .await
        .map_err(AppError::store(ctx))?;
    tx.commit()
        .await
        .context("commit tx")
        .map_err(AppError::store(ctx))?;
    Ok(row.into())
}
