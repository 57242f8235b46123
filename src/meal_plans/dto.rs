use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::MealPlan;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSlot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<MealSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<MealSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dinner: Option<MealSlot>,
}

impl DailyPlan {
    fn slots(&self) -> [(&'static str, Option<&MealSlot>); 3] {
        [
            ("breakfast", self.breakfast.as_ref()),
            ("lunch", self.lunch.as_ref()),
            ("dinner", self.dinner.as_ref()),
        ]
    }
}

/// Seven days of slots. Missing days deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekDays {
    #[serde(default)]
    pub monday: DailyPlan,
    #[serde(default)]
    pub tuesday: DailyPlan,
    #[serde(default)]
    pub wednesday: DailyPlan,
    #[serde(default)]
    pub thursday: DailyPlan,
    #[serde(default)]
    pub friday: DailyPlan,
    #[serde(default)]
    pub saturday: DailyPlan,
    #[serde(default)]
    pub sunday: DailyPlan,
}

impl WeekDays {
    fn days(&self) -> [(&'static str, &DailyPlan); 7] {
        [
            ("monday", &self.monday),
            ("tuesday", &self.tuesday),
            ("wednesday", &self.wednesday),
            ("thursday", &self.thursday),
            ("friday", &self.friday),
            ("saturday", &self.saturday),
            ("sunday", &self.sunday),
        ]
    }

    /// Every filled slot as `(day, meal, slot)`.
    pub fn filled_slots(&self) -> impl Iterator<Item = (&'static str, &'static str, &MealSlot)> {
        self.days().into_iter().flat_map(|(day, plan)| {
            plan.slots()
                .into_iter()
                .filter_map(move |(meal, slot)| slot.map(|s| (day, meal, s)))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekQuery {
    pub week_start_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMealPlanRequest {
    pub week_start_date: Option<String>,
    #[serde(default)]
    pub days: WeekDays,
}

/// A stored plan, or the empty skeleton for a week with no plan yet.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user: Uuid,
    #[serde(with = "iso_date")]
    pub week_start_date: Date,
    pub days: WeekDays,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

impl MealPlanView {
    pub fn empty(user: Uuid, week_start_date: Date) -> Self {
        Self {
            id: None,
            user,
            week_start_date,
            days: WeekDays::default(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl From<MealPlan> for MealPlanView {
    fn from(p: MealPlan) -> Self {
        Self {
            id: Some(p.id),
            user: p.user_id,
            week_start_date: p.week_start_date,
            days: p.days.0,
            created_at: Some(p.created_at),
            updated_at: Some(p.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    #[test]
    fn skeleton_has_seven_empty_days() {
        let user = Uuid::nil();
        let v = serde_json::to_value(MealPlanView::empty(user, date!(2024 - 01 - 15))).unwrap();
        assert_eq!(v["weekStartDate"], "2024-01-15");
        assert!(v.get("id").is_none());
        let days = v["days"].as_object().unwrap();
        assert_eq!(days.len(), 7);
        assert!(days.values().all(|d| d == &json!({})));
    }

    #[test]
    fn partial_week_fills_missing_days() {
        let days: WeekDays = serde_json::from_value(json!({
            "tuesday": { "dinner": { "name": "Stew", "servings": 4 } }
        }))
        .unwrap();
        assert_eq!(days.monday, DailyPlan::default());

        let filled: Vec<_> = days.filled_slots().map(|(d, m, s)| (d, m, s.name.as_str())).collect();
        assert_eq!(filled, vec![("tuesday", "dinner", "Stew")]);
    }
}
