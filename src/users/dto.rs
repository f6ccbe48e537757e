use serde::{Deserialize, Serialize};

use super::repo_types::PhysicalFitness;
use crate::ai::parse::{lenient_opt_f64, lenient_opt_i32};
use crate::auth::repo_types::User;
use crate::diets::repo_types::DietPlan;
use crate::workouts::repo_types::WorkoutPlan;

/// Body of onboarding and profile updates. Numbers may arrive as strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessRequest {
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub weight: Option<f64>,
    pub primary_goal: Option<String>,
    pub fitness_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub workouts_per_week: Option<i32>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub workout_duration: Option<i32>,
    pub workout_location: Option<String>,
    pub additional_info: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FitnessSaved {
    pub message: &'static str,
    pub data: PhysicalFitness,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessStats {
    pub bmi: f64,
    pub bmi_category: &'static str,
    pub weekly_activity_percent: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: User,
    pub physical_fitness: Option<PhysicalFitness>,
    pub fitness_stats: Option<FitnessStats>,
    pub workout_plans: Vec<WorkoutPlan>,
    pub diet_plans: Vec<DietPlan>,
}

/// Omitted fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateUserResponse {
    pub success: bool,
    pub user: User,
}
