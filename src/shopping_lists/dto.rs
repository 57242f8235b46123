use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::ShoppingListRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub quantity: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
}

/// Item as sent by a client. The id is optional and reassigned on collision.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewItem {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub item: NewItem,
}

/// Partial item update; absent fields stay as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListView {
    pub id: Uuid,
    pub user: Uuid,
    pub items: Vec<ShoppingItem>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<ShoppingListRow> for ShoppingListView {
    fn from(r: ShoppingListRow) -> Self {
        Self {
            id: r.id,
            user: r.user_id,
            items: r.items.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
