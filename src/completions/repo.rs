use anyhow::Context;
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::{DietPlanCompletion, WorkoutCompletion};

pub async fn insert_workout_completion(
    db: &PgPool,
    email: &str,
    workout_plan_id: Uuid,
    calories_burned: i32,
    completed_at: OffsetDateTime,
) -> anyhow::Result<WorkoutCompletion> {
    sqlx::query_as::<_, WorkoutCompletion>(
        r#"
        INSERT INTO workout_completions (user_email, workout_plan_id, calories_burned, completed_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_email, workout_plan_id, calories_burned, completed_at
        "#,
    )
    .bind(email)
    .bind(workout_plan_id)
    .bind(calories_burned)
    .bind(completed_at)
    .fetch_one(db)
    .await
    .context("insert workout completion")
}

pub async fn insert_diet_completion(
    db: &PgPool,
    email: &str,
    diet_plan_id: Uuid,
    calories_consumed: i32,
    completed_at: OffsetDateTime,
) -> anyhow::Result<DietPlanCompletion> {
    sqlx::query_as::<_, DietPlanCompletion>(
        r#"
        INSERT INTO diet_plan_completions (user_email, diet_plan_id, calories_consumed, completed_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_email, diet_plan_id, calories_consumed, completed_at
        "#,
    )
    .bind(email)
    .bind(diet_plan_id)
    .bind(calories_consumed)
    .bind(completed_at)
    .fetch_one(db)
    .await
    .context("insert diet completion")
}

/// Completions with `from <= completed_at < to`, oldest first.
pub async fn list_workout_completions(
    db: &PgPool,
    email: &str,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> anyhow::Result<Vec<WorkoutCompletion>> {
    sqlx::query_as::<_, WorkoutCompletion>(
        r#"
        SELECT id, user_email, workout_plan_id, calories_burned, completed_at
          FROM workout_completions
         WHERE user_email = $1 AND completed_at >= $2 AND completed_at < $3
         ORDER BY completed_at ASC
        "#,
    )
    .bind(email)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
    .context("list workout completions")
}

pub async fn list_diet_completions(
    db: &PgPool,
    email: &str,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> anyhow::Result<Vec<DietPlanCompletion>> {
    sqlx::query_as::<_, DietPlanCompletion>(
        r#"
        SELECT id, user_email, diet_plan_id, calories_consumed, completed_at
          FROM diet_plan_completions
         WHERE user_email = $1 AND completed_at >= $2 AND completed_at < $3
         ORDER BY completed_at ASC
        "#,
    )
    .bind(email)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
    .context("list diet completions")
}

pub async fn count_workout_completions(db: &PgPool, email: &str) -> anyhow::Result<i64> {
    let (n,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM workout_completions WHERE user_email = $1")
            .bind(email)
            .fetch_one(db)
            .await
            .context("count workout completions")?;
    Ok(n)
}

/// Distinct UTC days with at least one workout, newest first.
pub async fn workout_days(db: &PgPool, email: &str) -> anyhow::Result<Vec<Date>> {
    let rows: Vec<(Date,)> = sqlx::query_as(
        r#"
        SELECT DISTINCT (completed_at AT TIME ZONE 'UTC')::date AS day
          FROM workout_completions
         WHERE user_email = $1
         ORDER BY day DESC
        "#,
    )
    .bind(email)
    .fetch_all(db)
    .await
    .context("list workout days")?;
    Ok(rows.into_iter().map(|(d,)| d).collect())
}
