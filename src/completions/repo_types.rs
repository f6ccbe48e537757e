use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutCompletion {
    pub id: Uuid,
    pub user_email: String,
    pub workout_plan_id: Uuid,
    pub calories_burned: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DietPlanCompletion {
    pub id: Uuid,
    pub user_email: String,
    pub diet_plan_id: Uuid,
    pub calories_consumed: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
}
