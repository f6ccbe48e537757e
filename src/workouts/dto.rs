use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::repo_types::WorkoutPlan;
use crate::ai::parse::{lenient_i32, lenient_opt_i32, lenient_string};

#[derive(Debug, Serialize)]
pub struct WorkoutList {
    pub workouts: Vec<WorkoutPlan>,
}

#[derive(Debug, Deserialize)]
pub struct WorkoutFilter {
    pub category: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 20 }

#[derive(Debug, Deserialize)]
pub struct WorkoutIdRequest {
    pub workout_id: Option<String>,
}

/// Body of `POST /workouts/save-workout`; every field is required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveWorkoutRequest {
    pub routine_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub no_of_exercises: Option<i32>,
    pub estimated_duration: Option<String>,
    pub exercises: Option<serde_json::Value>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub calories: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct SavedWorkout {
    pub message: &'static str,
    pub workout: WorkoutPlan,
}

/// Workout plan as produced by the model. Exercises are keyed by their
/// 1-based position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWorkout {
    pub routine_name: String,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub no_of_exercises: i32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub estimated_duration: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub calories: i32,
    pub exercises: BTreeMap<u32, GeneratedExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedExercise {
    pub name: String,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub reps_and_sets: Option<String>,
    #[serde(default)]
    pub targeted_area: Option<String>,
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default, rename = "videoURL")]
    pub video_url: Option<String>,
}
