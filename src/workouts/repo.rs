use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewWorkoutPlan, WorkoutPlan};

const COLUMNS: &str = "id, routine_name, no_of_exercises, estimated_duration, exercises, \
     no_of_users, rating, category, calories, user_email, created_at";

pub async fn list_featured(db: &PgPool, limit: i64) -> anyhow::Result<Vec<WorkoutPlan>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM workout_plans ORDER BY no_of_users DESC, created_at DESC LIMIT $1"
    );
    sqlx::query_as::<_, WorkoutPlan>(&sql)
        .bind(limit)
        .fetch_all(db)
        .await
        .context("list featured workouts")
}

pub async fn list_recent(db: &PgPool, limit: i64) -> anyhow::Result<Vec<WorkoutPlan>> {
    let sql = format!("SELECT {COLUMNS} FROM workout_plans ORDER BY created_at DESC LIMIT $1");
    sqlx::query_as::<_, WorkoutPlan>(&sql)
        .bind(limit)
        .fetch_all(db)
        .await
        .context("list recent workouts")
}

pub async fn list(
    db: &PgPool,
    category: Option<&str>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<WorkoutPlan>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM workout_plans \
         WHERE ($1::text IS NULL OR category = $1) \
         ORDER BY rating DESC, created_at DESC \
         LIMIT $2 OFFSET $3"
    );
    sqlx::query_as::<_, WorkoutPlan>(&sql)
        .bind(category)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("list workouts")
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<WorkoutPlan>> {
    let sql = format!("SELECT {COLUMNS} FROM workout_plans WHERE id = $1");
    sqlx::query_as::<_, WorkoutPlan>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find workout by id")
}

pub async fn list_by_owner(db: &PgPool, email: &str) -> anyhow::Result<Vec<WorkoutPlan>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM workout_plans WHERE user_email = $1 ORDER BY created_at DESC"
    );
    sqlx::query_as::<_, WorkoutPlan>(&sql)
        .bind(email)
        .fetch_all(db)
        .await
        .context("list workouts by owner")
}

/// New plans start with one user and no rating.
pub async fn insert(
    db: &PgPool,
    plan: &NewWorkoutPlan,
    owner_email: &str,
) -> anyhow::Result<WorkoutPlan> {
    let sql = format!(
        "INSERT INTO workout_plans \
            (routine_name, no_of_exercises, estimated_duration, exercises, \
             no_of_users, rating, category, calories, user_email) \
         VALUES ($1, $2, $3, $4, 1, 0, $5, $6, $7) \
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, WorkoutPlan>(&sql)
        .bind(&plan.routine_name)
        .bind(plan.no_of_exercises)
        .bind(&plan.estimated_duration)
        .bind(&plan.exercises)
        .bind(&plan.category)
        .bind(plan.calories)
        .bind(owner_email)
        .fetch_one(db)
        .await
        .context("insert workout plan")
}
