use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{FitnessRequest, FitnessSaved, ProfileResponse, UpdateUserRequest, UpdateUserResponse},
    repo,
    services::{fitness_stats, validate_fitness},
};
use crate::{
    auth::{
        repo::{is_unique_violation, UserChanges},
        repo_types::User,
        services::current_user,
        validation::{is_valid_email, is_valid_username, normalize_email},
        AuthUser,
    },
    diets,
    errors::{internal, ApiError},
    extractors::ApiJson,
    state::AppState,
    workouts,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/onboarding", post(onboarding))
        .route("/user/fitness", put(update_fitness))
        .route("/user/profile", get(profile))
        .route("/user/update", post(update_user))
        .route("/user", delete(delete_user))
}

#[instrument(skip(state, body))]
pub async fn onboarding(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<FitnessRequest>,
) -> Result<(StatusCode, Json<FitnessSaved>), ApiError> {
    let fitness = validate_fitness(body)?;
    let user = current_user(&state, user_id).await?;

    let conflict = || ApiError::Conflict("Onboarding data already exists.".into());
    let existing = repo::find_fitness_by_email(&state.db, &user.email)
        .await
        .map_err(internal("find fitness profile failed"))?;
    if existing.is_some() {
        warn!(%user_id, "onboarding repeated");
        return Err(conflict());
    }

    let data = match repo::insert_fitness(&state.db, &user.email, &fitness).await {
        Ok(row) => row,
        Err(e) if is_unique_violation(&e) => return Err(conflict()),
        Err(e) => return Err(internal("insert fitness profile failed")(e)),
    };

    info!(%user_id, "onboarding saved");
    Ok((
        StatusCode::CREATED,
        Json(FitnessSaved {
            message: "Onboarding data saved successfully!",
            data,
        }),
    ))
}

#[instrument(skip(state, body))]
pub async fn update_fitness(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<FitnessRequest>,
) -> Result<Json<FitnessSaved>, ApiError> {
    let fitness = validate_fitness(body)?;
    let user = current_user(&state, user_id).await?;

    let data = repo::update_fitness(&state.db, &user.email, &fitness)
        .await
        .map_err(internal("update fitness profile failed"))?
        .ok_or_else(|| ApiError::not_found("Fitness data not found for the user."))?;

    info!(%user_id, "fitness profile updated");
    Ok(Json(FitnessSaved {
        message: "Fitness data updated successfully!",
        data,
    }))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = current_user(&state, user_id).await?;

    let (physical_fitness, workout_plans, diet_plans) = tokio::try_join!(
        repo::find_fitness_by_email(&state.db, &user.email),
        workouts::repo::list_by_owner(&state.db, &user.email),
        diets::repo::list_by_owner(&state.db, &user.email),
    )
    .map_err(internal("load profile failed"))?;

    let stats = physical_fitness.as_ref().and_then(fitness_stats);
    Ok(Json(ProfileResponse {
        user,
        physical_fitness,
        fitness_stats: stats,
        workout_plans,
        diet_plans,
    }))
}

#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<UpdateUserRequest>,
) -> Result<Json<UpdateUserResponse>, ApiError> {
    let email = body
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing required fields"))?;
    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("Invalid email"));
    }
    let username = body.username.as_deref().map(str::trim).filter(|u| !u.is_empty());
    if let Some(u) = username {
        if !is_valid_username(u) {
            return Err(ApiError::bad_request(
                "Username must be 3-32 letters, digits or underscores",
            ));
        }
    }

    let current = current_user(&state, user_id).await?;
    let changes = UserChanges {
        email: &email,
        username: username.or(current.username.as_deref()),
        name: body.name.as_deref().or(current.name.as_deref()),
        image: body.image.as_deref().or(current.image.as_deref()),
    };

    let user = match User::update_profile(&state.db, user_id, &changes).await {
        Ok(Some(u)) => u,
        Ok(None) => return Err(ApiError::unauthorized("Unauthorized")),
        Err(e) if is_unique_violation(&e) => {
            warn!(%user_id, "profile update conflicts with another user");
            return Err(ApiError::Conflict("Email or username already in use".into()));
        }
        Err(e) => return Err(internal("update user failed")(e)),
    };

    info!(%user_id, "user profile updated");
    Ok(Json(UpdateUserResponse { success: true, user }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<StatusCode, ApiError> {
    let deleted = User::delete(&state.db, user_id)
        .await
        .map_err(internal("delete user failed"))?;
    if !deleted {
        return Err(ApiError::unauthorized("Unauthorized"));
    }
    info!(%user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
