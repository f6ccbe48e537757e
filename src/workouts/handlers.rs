use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{
        GeneratedWorkout, SaveWorkoutRequest, SavedWorkout, WorkoutFilter, WorkoutIdRequest,
        WorkoutList,
    },
    repo,
    repo_types::WorkoutPlan,
    services::{
        parse_generated_workout, parse_plan_id, validate_new_workout, FEATURED_LIMIT, MAX_PAGE,
        RECENT_LIMIT,
    },
};
use crate::{
    ai::{
        dto::{GenerateRequest, GeneratedResponse},
        parse::unparsable,
        prompts::workout_prompt,
    },
    auth::{services::current_user, AuthUser},
    catalog,
    errors::{internal, ApiError},
    extractors::{ApiJson, ApiQuery},
    state::AppState,
    users,
};

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/workouts", get(list_workouts).post(get_workout))
        .route("/workouts/featured", get(featured_workouts))
        .route("/workouts/recent", get(recent_workouts))
        .route("/workouts/save-workout", post(save_workout))
        .route("/workout-generator", post(generate_workout))
}

#[instrument(skip(state))]
pub async fn featured_workouts(State(state): State<AppState>) -> Result<Json<WorkoutList>, ApiError> {
    let workouts = repo::list_featured(&state.db, FEATURED_LIMIT)
        .await
        .map_err(internal("list featured workouts failed"))?;
    Ok(Json(WorkoutList { workouts }))
}

#[instrument(skip(state))]
pub async fn recent_workouts(State(state): State<AppState>) -> Result<Json<WorkoutList>, ApiError> {
    let workouts = repo::list_recent(&state.db, RECENT_LIMIT)
        .await
        .map_err(internal("list recent workouts failed"))?;
    Ok(Json(WorkoutList { workouts }))
}

#[instrument(skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<WorkoutFilter>,
) -> Result<Json<WorkoutList>, ApiError> {
    let category = filter.category.as_deref().filter(|c| !c.trim().is_empty());
    let limit = filter.limit.clamp(1, MAX_PAGE);
    let offset = filter.offset.max(0);
    let workouts = repo::list(&state.db, category, limit, offset)
        .await
        .map_err(internal("list workouts failed"))?;
    Ok(Json(WorkoutList { workouts }))
}

#[instrument(skip(state, body))]
pub async fn get_workout(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<WorkoutIdRequest>,
) -> Result<Json<WorkoutPlan>, ApiError> {
    let id = parse_plan_id(
        body.workout_id.as_deref(),
        "Workout ID is required",
        "Workout not found",
    )?;
    let workout = repo::find_by_id(&state.db, id)
        .await
        .map_err(internal("find workout failed"))?
        .ok_or_else(|| ApiError::not_found("Workout not found"))?;
    Ok(Json(workout))
}

#[instrument(skip(state, body))]
pub async fn save_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<SaveWorkoutRequest>,
) -> Result<(StatusCode, Json<SavedWorkout>), ApiError> {
    let plan = validate_new_workout(body).map_err(|e| {
        warn!(%user_id, "save workout with missing fields");
        e
    })?;
    let user = current_user(&state, user_id).await?;

    let workout = repo::insert(&state.db, &plan, &user.email)
        .await
        .map_err(internal("insert workout failed"))?;

    info!(%user_id, workout_id = %workout.id, "workout plan saved");
    Ok((
        StatusCode::CREATED,
        Json(SavedWorkout {
            message: "Workout plan saved successfully!",
            workout,
        }),
    ))
}

#[instrument(skip(state, body))]
pub async fn generate_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<GenerateRequest>,
) -> Result<Json<GeneratedResponse<GeneratedWorkout>>, ApiError> {
    let preferences = body.preferences()?;
    let user = current_user(&state, user_id).await?;

    let profile = users::repo::find_fitness_by_email(&state.db, &user.email)
        .await
        .map_err(internal("find fitness profile failed"))?
        .ok_or_else(|| ApiError::not_found("Fitness data not found for the user."))?;

    let exercises = catalog::repo::list_exercises(&state.db, Some(&profile.workout_location))
        .await
        .map_err(internal("list exercises failed"))?;
    if exercises.is_empty() {
        warn!(location = %profile.workout_location, "no catalog exercises for location");
    }

    let prompt = workout_prompt(&profile, &exercises, preferences);
    let raw = state
        .ai
        .generate(&prompt)
        .await
        .map_err(internal("workout generation failed"))?;
    let plan = parse_generated_workout(&raw).map_err(unparsable(&raw))?;

    info!(%user_id, exercises = plan.exercises.len(), "workout plan generated");
    Ok(Json(GeneratedResponse {
        message: "Workout plan generated successfully",
        plan,
    }))
}
