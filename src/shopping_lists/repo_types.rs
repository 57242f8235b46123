use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::ShoppingItem;

#[derive(Debug, Clone, FromRow)]
pub struct ShoppingListRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Json<Vec<ShoppingItem>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
