use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{
    dto::{CompleteDietRequest, CompleteWorkoutRequest, Completed, CompletionList, CompletionRange},
    repo,
    repo_types::{DietPlanCompletion, WorkoutCompletion},
    services::{calories, completion_time, resolve_range},
};
use crate::{
    auth::{services::current_user, AuthUser},
    diets,
    errors::{internal, ApiError},
    extractors::{ApiJson, ApiQuery},
    state::AppState,
    workouts::{self, services::parse_plan_id},
};

pub fn completion_routes() -> Router<AppState> {
    Router::new()
        .route("/workouts/complete", post(complete_workout))
        .route("/diet-plans/complete", post(complete_diet_plan))
        .route("/completions", get(list_completions))
}

#[instrument(skip(state, body))]
pub async fn complete_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<CompleteWorkoutRequest>,
) -> Result<(StatusCode, Json<Completed<WorkoutCompletion>>), ApiError> {
    let plan_id = parse_plan_id(
        body.workout_plan_id.as_deref(),
        "workoutPlanId is required",
        "Workout not found",
    )?;
    let burned = calories(body.calories_burned, "caloriesBurned")?;
    let completed_at = completion_time(body.completed_at, OffsetDateTime::now_utc())?;
    let user = current_user(&state, user_id).await?;

    workouts::repo::find_by_id(&state.db, plan_id)
        .await
        .map_err(internal("find workout failed"))?
        .ok_or_else(|| ApiError::not_found("Workout not found"))?;

    let completion =
        repo::insert_workout_completion(&state.db, &user.email, plan_id, burned, completed_at)
            .await
            .map_err(internal("insert workout completion failed"))?;

    info!(%user_id, workout_id = %plan_id, "workout completed");
    Ok((
        StatusCode::CREATED,
        Json(Completed {
            message: "Workout completion recorded",
            completion,
        }),
    ))
}

#[instrument(skip(state, body))]
pub async fn complete_diet_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<CompleteDietRequest>,
) -> Result<(StatusCode, Json<Completed<DietPlanCompletion>>), ApiError> {
    let plan_id = parse_plan_id(
        body.diet_plan_id.as_deref(),
        "dietPlanId is required",
        "Diet plan not found",
    )?;
    let consumed = calories(body.calories_consumed, "caloriesConsumed")?;
    let completed_at = completion_time(body.completed_at, OffsetDateTime::now_utc())?;
    let user = current_user(&state, user_id).await?;

    diets::repo::find_by_id(&state.db, plan_id)
        .await
        .map_err(internal("find diet plan failed"))?
        .ok_or_else(|| ApiError::not_found("Diet plan not found"))?;

    let completion =
        repo::insert_diet_completion(&state.db, &user.email, plan_id, consumed, completed_at)
            .await
            .map_err(internal("insert diet completion failed"))?;

    info!(%user_id, diet_id = %plan_id, "diet plan completed");
    Ok((
        StatusCode::CREATED,
        Json(Completed {
            message: "Diet plan completion recorded",
            completion,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_completions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(range): ApiQuery<CompletionRange>,
) -> Result<Json<CompletionList>, ApiError> {
    let (from, to) = resolve_range(&range, OffsetDateTime::now_utc())?;
    let user = current_user(&state, user_id).await?;

    let (workouts, diets) = tokio::try_join!(
        repo::list_workout_completions(&state.db, &user.email, from, to),
        repo::list_diet_completions(&state.db, &user.email, from, to),
    )
    .map_err(internal("list completions failed"))?;

    Ok(Json(CompletionList { workouts, diets }))
}
