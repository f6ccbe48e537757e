use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub routine_name: String,
    pub no_of_exercises: i32,
    pub estimated_duration: String,
    pub exercises: serde_json::Value, // {"1": {...}, "2": {...}}
    pub no_of_users: i32,
    pub rating: f64,
    pub category: String,
    pub calories: i32,
    pub user_email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated input for a new plan; owner is supplied separately.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutPlan {
    pub routine_name: String,
    pub no_of_exercises: i32,
    pub estimated_duration: String,
    pub exercises: serde_json::Value,
    pub category: String,
    pub calories: i32,
}
