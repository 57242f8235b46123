use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{MealPlanView, UpsertMealPlanRequest, WeekQuery};
use super::services::{get_plan, upsert_plan};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn meal_plan_routes() -> Router<AppState> {
    Router::new().route("/meal-plans", get(get_week).post(save_week))
}

/// GET /meal-plans?weekStartDate=YYYY-MM-DD
#[instrument(skip(state))]
pub async fn get_week(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<WeekQuery>,
) -> Result<Json<MealPlanView>, AppError> {
    let plan = get_plan(&state.db, user_id, q.week_start_date.as_deref()).await?;
    Ok(Json(plan))
}

#[instrument(skip(state, body))]
pub async fn save_week(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<UpsertMealPlanRequest>,
) -> Result<Json<MealPlanView>, AppError> {
    let plan = upsert_plan(&state.db, user_id, body).await?;
    Ok(Json(plan))
}
