use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{DayMeals, DietPlan};
use crate::ai::parse::{lenient_f64, lenient_i32, lenient_opt_f64, lenient_opt_i32, lenient_string};
use crate::catalog::repo_types::Dish;

#[derive(Debug, Deserialize)]
pub struct DietIdRequest {
    pub diet_id: Option<String>,
}

/// A meal as sent by clients: either a bare dish name or a full nutrition
/// object of which only the name is kept.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MealRef {
    Name(String),
    Detailed { name: String },
}

impl MealRef {
    pub fn into_name(self) -> String {
        match self {
            MealRef::Name(name) | MealRef::Detailed { name } => name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDietPlanRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub duration: Option<i32>,
    pub meals: Option<Vec<DayMeals<MealRef>>>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub meals_per_day: Option<i32>,
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub total_calories: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDietPlan {
    pub message: &'static str,
    pub diet_plan: DietPlan,
}

/// A stored meal after catalog lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExpandedMeal {
    Found(Dish),
    Missing { name: String, error: &'static str },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTotals {
    pub calories: f64,
    pub carbohydrates: f64,
    pub protein: f64,
    pub fats: f64,
    pub sugar: f64,
    pub fibre: f64,
    pub sodium: f64,
    pub calcium: f64,
    pub iron: f64,
    pub vitamin_c: f64,
    pub folate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayNutrition {
    pub day: i32,
    #[serde(flatten)]
    pub totals: NutritionTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub daily: Vec<DayNutrition>,
    pub daily_average: NutritionTotals,
}

/// `POST /diet-plans/id` response: the stored plan with dishes expanded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedDietPlan {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub duration: i32,
    pub meals: Vec<DayMeals<ExpandedMeal>>,
    pub meals_per_day: i32,
    pub difficulty: String,
    pub rating: f64,
    pub total_calories: f64,
    pub user_email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub nutrition: NutritionSummary,
}

/// Diet plan as produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDietPlan {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub duration: i32,
    pub meals: Vec<DayMeals<MealNutrition>>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub meals_per_day: i32,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_calories: f64,
    #[serde(default, skip_deserializing)]
    pub user_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealNutrition {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub calories: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub carbohydrates: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub protein: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fats: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sugar: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fibre: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sodium: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub calcium: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub iron: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub vitamin_c: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub folate: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ingredients: String,
}
