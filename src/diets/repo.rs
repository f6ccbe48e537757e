use anyhow::Context;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::repo_types::{DietPlan, NewDietPlan};

const COLUMNS: &str = "id, name, description, duration, meals, meals_per_day, difficulty, \
     rating, total_calories, user_email, created_at";

pub async fn list_top_rated(db: &PgPool, limit: i64) -> anyhow::Result<Vec<DietPlan>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM diet_plans ORDER BY rating DESC, created_at DESC LIMIT $1"
    );
    sqlx::query_as::<_, DietPlan>(&sql)
        .bind(limit)
        .fetch_all(db)
        .await
        .context("list top rated diet plans")
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<DietPlan>> {
    let sql = format!("SELECT {COLUMNS} FROM diet_plans WHERE id = $1");
    sqlx::query_as::<_, DietPlan>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find diet plan by id")
}

pub async fn list_by_owner(db: &PgPool, email: &str) -> anyhow::Result<Vec<DietPlan>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM diet_plans WHERE user_email = $1 ORDER BY created_at DESC"
    );
    sqlx::query_as::<_, DietPlan>(&sql)
        .bind(email)
        .fetch_all(db)
        .await
        .context("list diet plans by owner")
}

pub async fn insert(db: &PgPool, plan: &NewDietPlan, owner_email: &str) -> anyhow::Result<DietPlan> {
    let sql = format!(
        "INSERT INTO diet_plans \
            (name, description, duration, meals, meals_per_day, difficulty, rating, \
             total_calories, user_email) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, DietPlan>(&sql)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.duration)
        .bind(Json(&plan.meals))
        .bind(plan.meals_per_day)
        .bind(&plan.difficulty)
        .bind(plan.rating)
        .bind(plan.total_calories)
        .bind(owner_email)
        .fetch_one(db)
        .await
        .context("insert diet plan")
}
