use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use super::{
    repo,
    repo_types::{Dish, ExerciseDetails},
};
use crate::{
    errors::{internal, ApiError},
    extractors::ApiQuery,
    state::AppState,
};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/dishes", get(list_dishes))
        .route("/exercises", get(list_exercises))
}

#[derive(Debug, Deserialize)]
pub struct ExerciseFilter {
    pub category: Option<String>,
}

#[instrument(skip(state))]
pub async fn list_dishes(State(state): State<AppState>) -> Result<Json<Vec<Dish>>, ApiError> {
    let dishes = repo::list_dishes(&state.db)
        .await
        .map_err(internal("list dishes failed"))?;
    Ok(Json(dishes))
}

#[instrument(skip(state))]
pub async fn list_exercises(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ExerciseFilter>,
) -> Result<Json<Vec<ExerciseDetails>>, ApiError> {
    let category = filter.category.as_deref().filter(|c| !c.trim().is_empty());
    let exercises = repo::list_exercises(&state.db, category)
        .await
        .map_err(internal("list exercises failed"))?;
    Ok(Json(exercises))
}
