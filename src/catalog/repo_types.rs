use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog dish, unique by name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: Uuid,
    pub name: String,
    pub calories: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub protein: Option<f64>,
    pub fats: Option<f64>,
    pub sugar: Option<f64>,
    pub fibre: Option<String>,
    pub sodium: Option<f64>,
    pub calcium: Option<f64>,
    pub iron: Option<f64>,
    pub vitamin_c: Option<f64>,
    pub folate: Option<f64>,
    pub ingredients: Option<String>,
}

/// Catalog exercise, unique by name. `category` doubles as the workout
/// location filter (home, gym, outdoors, mixed).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDetails {
    pub id: Uuid,
    pub name: String,
    pub equipment: Option<String>,
    pub category: Option<String>,
    pub targeted_areas: Option<String>,
    #[serde(rename = "videoURL")]
    pub video_url: Option<String>,
}
