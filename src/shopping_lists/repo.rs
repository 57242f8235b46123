use anyhow::Context;
use sqlx::{types::Json, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::dto::ShoppingItem;
use super::repo_types::ShoppingListRow;

const LIST_COLUMNS: &str = "id, user_id, items, created_at, updated_at";

/// The user's list, created empty if it does not exist yet.
pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> anyhow::Result<ShoppingListRow> {
    let mut tx = db.begin().await.context("begin tx")?;
    ensure_tx(&mut tx, user_id).await?;
    let row = lock_tx(&mut tx, user_id)
        .await?
        .context("shopping list vanished after insert")?;
    tx.commit().await.context("commit tx")?;
    Ok(row)
}

pub async fn ensure_tx(tx: &mut Transaction<'_, Postgres>, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO shopping_lists (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await
    .context("ensure shopping list")?;
    Ok(())
}

/// Reads the list and holds its row lock until the transaction ends.
pub async fn lock_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> anyhow::Result<Option<ShoppingListRow>> {
    let sql = format!("SELECT {LIST_COLUMNS} FROM shopping_lists WHERE user_id = $1 FOR UPDATE");
    sqlx::query_as::<_, ShoppingListRow>(&sql)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await
        .context("lock shopping list")
}

pub async fn save_items_tx(
    tx: &mut Transaction<'_, Postgres>,
    list_id: Uuid,
    items: &[ShoppingItem],
) -> anyhow::Result<ShoppingListRow> {
    let sql = format!(
        r#"
        UPDATE shopping_lists
           SET items = $2, updated_at = now()
         WHERE id = $1
        RETURNING {LIST_COLUMNS}
        "#
    );
    sqlx::query_as::<_, ShoppingListRow>(&sql)
        .bind(list_id)
        .bind(Json(items))
        .fetch_one(&mut **tx)
        .await
        .context("save shopping list items")
}
