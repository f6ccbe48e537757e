use anyhow::Context;
use sqlx::PgPool;

use super::repo_types::{NewPhysicalFitness, PhysicalFitness};

const COLUMNS: &str = "id, user_email, age, gender, height, weight, fitness_level, primary_goal, \
     workout_duration, workout_location, workouts_per_week, additional_info, last_updated";

pub async fn find_fitness_by_email(
    db: &PgPool,
    email: &str,
) -> anyhow::Result<Option<PhysicalFitness>> {
    let sql = format!("SELECT {COLUMNS} FROM physical_fitness WHERE user_email = $1");
    sqlx::query_as::<_, PhysicalFitness>(&sql)
        .bind(email)
        .fetch_optional(db)
        .await
        .context("find fitness profile")
}

/// Fails with a unique violation when the user already has a profile.
pub async fn insert_fitness(
    db: &PgPool,
    email: &str,
    f: &NewPhysicalFitness,
) -> anyhow::Result<PhysicalFitness> {
    let sql = format!(
        "INSERT INTO physical_fitness \
            (user_email, age, gender, height, weight, fitness_level, primary_goal, \
             workout_duration, workout_location, workouts_per_week, additional_info) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, PhysicalFitness>(&sql)
        .bind(email)
        .bind(f.age)
        .bind(&f.gender)
        .bind(f.height)
        .bind(f.weight)
        .bind(&f.fitness_level)
        .bind(&f.primary_goal)
        .bind(f.workout_duration)
        .bind(&f.workout_location)
        .bind(f.workouts_per_week)
        .bind(&f.additional_info)
        .fetch_one(db)
        .await?;
    Ok(row)
}

pub async fn update_fitness(
    db: &PgPool,
    email: &str,
    f: &NewPhysicalFitness,
) -> anyhow::Result<Option<PhysicalFitness>> {
    let sql = format!(
        "UPDATE physical_fitness SET \
            age = $2, gender = $3, height = $4, weight = $5, fitness_level = $6, \
            primary_goal = $7, workout_duration = $8, workout_location = $9, \
            workouts_per_week = $10, additional_info = $11, last_updated = now() \
         WHERE user_email = $1 \
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, PhysicalFitness>(&sql)
        .bind(email)
        .bind(f.age)
        .bind(&f.gender)
        .bind(f.height)
        .bind(f.weight)
        .bind(&f.fitness_level)
        .bind(&f.primary_goal)
        .bind(f.workout_duration)
        .bind(&f.workout_location)
        .bind(f.workouts_per_week)
        .bind(&f.additional_info)
        .fetch_optional(db)
        .await
        .context("update fitness profile")
}
