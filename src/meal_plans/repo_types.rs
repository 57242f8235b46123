use sqlx::{types::Json, FromRow};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::dto::WeekDays;

#[derive(Debug, Clone, FromRow)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub week_start_date: Date,
    pub days: Json<WeekDays>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Half-open `[start, end)` range of seven days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    pub start: Date,
    pub end: Date,
}
