use std::collections::HashMap;

use anyhow::Context;
use sqlx::PgPool;

use super::repo_types::{Dish, ExerciseDetails};

const DISH_COLUMNS: &str = "id, name, calories, carbohydrates, protein, fats, sugar, fibre, \
     sodium, calcium, iron, vitamin_c, folate, ingredients";

pub async fn list_dishes(db: &PgPool) -> anyhow::Result<Vec<Dish>> {
    let sql = format!("SELECT {DISH_COLUMNS} FROM dishes ORDER BY name ASC");
    sqlx::query_as::<_, Dish>(&sql)
        .fetch_all(db)
        .await
        .context("list dishes")
}

/// Looks up every distinct name in one round-trip. Names with no dish are
/// simply absent from the map.
pub async fn find_dishes_by_names(
    db: &PgPool,
    names: &[String],
) -> anyhow::Result<HashMap<String, Dish>> {
    if names.is_empty() {
        return Ok(HashMap::new());
    }
    let sql = format!("SELECT {DISH_COLUMNS} FROM dishes WHERE name = ANY($1)");
    let rows = sqlx::query_as::<_, Dish>(&sql)
        .bind(names)
        .fetch_all(db)
        .await
        .context("find dishes by names")?;
    Ok(rows.into_iter().map(|d| (d.name.clone(), d)).collect())
}

pub async fn list_exercises(
    db: &PgPool,
    category: Option<&str>,
) -> anyhow::Result<Vec<ExerciseDetails>> {
    sqlx::query_as::<_, ExerciseDetails>(
        r#"
        SELECT id, name, equipment, category, targeted_areas, video_url
          FROM exercise_details
         WHERE ($1::text IS NULL OR category = $1)
         ORDER BY name ASC
        "#,
    )
    .bind(category)
    .fetch_all(db)
    .await
    .context("list exercises")
}
