use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Physical-fitness profile, one per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalFitness {
    pub id: Uuid,
    pub user_email: String,
    pub age: i32,
    pub gender: String,
    pub height: f64, // cm
    pub weight: f64, // kg
    pub fitness_level: String,
    pub primary_goal: String,
    pub workout_duration: i32, // minutes
    pub workout_location: String,
    pub workouts_per_week: i32,
    pub additional_info: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPhysicalFitness {
    pub age: i32,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    pub fitness_level: String,
    pub primary_goal: String,
    pub workout_duration: i32,
    pub workout_location: String,
    pub workouts_per_week: i32,
    pub additional_info: Option<String>,
}
