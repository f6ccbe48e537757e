use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{DietPlanCompletion, WorkoutCompletion};
use crate::ai::parse::lenient_opt_i32;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteWorkoutRequest {
    pub workout_plan_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub calories_burned: Option<i32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteDietRequest {
    pub diet_plan_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub calories_consumed: Option<i32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub struct Completed<T> {
    pub message: &'static str,
    pub completion: T,
}

/// RFC 3339 bounds of `GET /completions`.
#[derive(Debug, Default, Deserialize)]
pub struct CompletionRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompletionList {
    pub workouts: Vec<WorkoutCompletion>,
    pub diets: Vec<DietPlanCompletion>,
}
