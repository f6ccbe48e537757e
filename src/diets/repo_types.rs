use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ai::parse::lenient_i32;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub duration: i32,
    pub meals: serde_json::Value, // [{"day": 1, "meals": ["Dish", ...]}, ...]
    pub meals_per_day: i32,
    pub difficulty: String,
    pub rating: f64,
    pub total_calories: f64,
    pub user_email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// One day of a plan. Stored plans hold dish names; reads expand them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayMeals<T> {
    #[serde(default, deserialize_with = "lenient_i32")]
    pub day: i32,
    #[serde(default = "Vec::new")]
    pub meals: Vec<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDietPlan {
    pub name: String,
    pub description: String,
    pub duration: i32,
    pub meals: Vec<DayMeals<String>>,
    pub meals_per_day: i32,
    pub difficulty: String,
    pub rating: f64,
    pub total_calories: f64,
}
