use anyhow::Context;
use sqlx::PgPool;
use time::{macros::format_description, Date, Duration};
use tracing::info;
use uuid::Uuid;

use super::dto::{MealPlanView, UpsertMealPlanRequest, WeekDays};
use super::repo;
use super::repo_types::Week;
use crate::error::AppError;

const WEEK_REQUIRED: &str = "Week start date is required";

/// Parses `YYYY-MM-DD`, ignoring any time part after `T`, into the week it
/// opens.
pub fn parse_week(raw: Option<&str>) -> Result<Week, AppError> {
    let missing = || AppError::Validation(WEEK_REQUIRED.into());
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(missing)?;
    let day = raw.split('T').next().unwrap_or(raw);
    let start = Date::parse(day, format_description!("[year]-[month]-[day]"))
        .map_err(|_| missing())?;
    let end = start.checked_add(Duration::days(7)).ok_or_else(missing)?;
    Ok(Week { start, end })
}

fn validate_days(days: &WeekDays) -> Result<(), AppError> {
    for (day, meal, slot) in days.filled_slots() {
        if slot.name.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Error updating meal plan: {day} {meal} needs a name"
            )));
        }
        if slot.servings.is_some_and(|s| s <= 0) {
            return Err(AppError::Validation(format!(
                "Error updating meal plan: {day} {meal} servings must be positive"
            )));
        }
    }
    Ok(())
}

pub async fn get_plan(
    db: &PgPool,
    user_id: Uuid,
    raw_week: Option<&str>,
) -> Result<MealPlanView, AppError> {
    let week = parse_week(raw_week)?;
    let plan = repo::find_in_week(db, user_id, week)
        .await
        .map_err(AppError::store("Error fetching meal plan"))?;
    Ok(plan
        .map(MealPlanView::from)
        .unwrap_or_else(|| MealPlanView::empty(user_id, week.start)))
}

/// Replaces the plan that starts inside the requested week, or creates one.
pub async fn upsert_plan(
    db: &PgPool,
    user_id: Uuid,
    body: UpsertMealPlanRequest,
) -> Result<MealPlanView, AppError> {
    let week = parse_week(body.week_start_date.as_deref())?;
    validate_days(&body.days)?;

    let plan = async {
        let mut tx = db.begin().await.context("begin tx")?;
        let plan = match repo::lock_in_week_tx(&mut tx, user_id, week).await? {
            Some(id) => repo::replace_tx(&mut tx, id, week, &body.days).await?,
            None => repo::insert_tx(&mut tx, user_id, week, &body.days).await?,
        };
        tx.commit().await.context("commit tx")?;
        anyhow::Ok(plan)
    }
    .await
    .map_err(AppError::store("Error updating meal plan"))?;

    info!(plan_id = %plan.id, %user_id, week = %week.start, "meal plan saved");
    Ok(plan.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal_plans::dto::{DailyPlan, MealSlot};
    use time::macros::date;

    #[test]
    fn week_accepts_plain_and_timestamped_dates() {
        let week = parse_week(Some("2024-01-15")).unwrap();
        assert_eq!(week.start, date!(2024 - 01 - 15));
        assert_eq!(week.end, date!(2024 - 01 - 22));

        let week = parse_week(Some("2024-01-15T00:00:00.000Z")).unwrap();
        assert_eq!(week.start, date!(2024 - 01 - 15));
    }

    #[test]
    fn week_requires_a_date() {
        for raw in [None, Some(""), Some("  "), Some("next monday"), Some("2024-13-01")] {
            let err = parse_week(raw).unwrap_err();
            assert_eq!(err.to_string(), WEEK_REQUIRED, "input {raw:?}");
        }
    }

    #[test]
    fn week_window_spans_month_end() {
        let week = parse_week(Some("2024-02-26")).unwrap();
        assert_eq!(week.end, date!(2024 - 03 - 04));
    }

    #[test]
    fn blank_slot_name_is_rejected() {
        let mut days = WeekDays::default();
        days.friday = DailyPlan {
            lunch: Some(MealSlot {
                name: " ".into(),
                time: None,
                servings: Some(2),
            }),
            ..Default::default()
        };
        let err = validate_days(&days).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("friday lunch"));

        assert!(validate_days(&WeekDays::default()).is_ok());
    }
}
