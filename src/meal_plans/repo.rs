use anyhow::Context;
use sqlx::{types::Json, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::dto::WeekDays;
use super::repo_types::{MealPlan, Week};

const PLAN_COLUMNS: &str = "id, user_id, week_start_date, days, created_at, updated_at";

/// Earliest plan of `user_id` starting inside `week`.
pub async fn find_in_week(
    db: &PgPool,
    user_id: Uuid,
    week: Week,
) -> anyhow::Result<Option<MealPlan>> {
    let sql = format!(
        r#"
        SELECT {PLAN_COLUMNS}
          FROM meal_plans
         WHERE user_id = $1 AND week_start_date >= $2 AND week_start_date < $3
         ORDER BY week_start_date
         LIMIT 1
        "#
    );
    sqlx::query_as::<_, MealPlan>(&sql)
        .bind(user_id)
        .bind(week.start)
        .bind(week.end)
        .fetch_optional(db)
        .await
        .context("find meal plan in week")
}

/// Locks the plan inside `week`, if any, and returns its id.
pub async fn lock_in_week_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    week: Week,
) -> anyhow::Result<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
          FROM meal_plans
         WHERE user_id = $1 AND week_start_date >= $2 AND week_start_date < $3
         ORDER BY week_start_date
         LIMIT 1
           FOR UPDATE
        "#,
    )
    .bind(user_id)
    .bind(week.start)
    .bind(week.end)
    .fetch_optional(&mut **tx)
    .await
    .context("lock meal plan in week")
}

pub async fn replace_tx(
    tx: &mut Transaction<'_, Postgres>,
    plan_id: Uuid,
    week: Week,
    days: &WeekDays,
) -> anyhow::Result<MealPlan> {
    let sql = format!(
        r#"
        UPDATE meal_plans
           SET week_start_date = $2, days = $3, updated_at = now()
         WHERE id = $1
        RETURNING {PLAN_COLUMNS}
        "#
    );
    sqlx::query_as::<_, MealPlan>(&sql)
        .bind(plan_id)
        .bind(week.start)
        .bind(Json(days))
        .fetch_one(&mut **tx)
        .await
        .context("replace meal plan")
}

pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    week: Week,
    days: &WeekDays,
) -> anyhow::Result<MealPlan> {
    let sql = format!(
        r#"
        INSERT INTO meal_plans (user_id, week_start_date, days)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, week_start_date)
        DO UPDATE SET days = EXCLUDED.days, updated_at = now()
        RETURNING {PLAN_COLUMNS}
        "#
    );
    sqlx::query_as::<_, MealPlan>(&sql)
        .bind(user_id)
        .bind(week.start)
        .bind(Json(days))
        .fetch_one(&mut **tx)
        .await
        .context("insert meal plan")
}
