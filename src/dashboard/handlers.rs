use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::instrument;

use super::{
    dto::DashboardStats,
    services::{build_stats, window_start},
};
use crate::{
    auth::{services::current_user, AuthUser},
    completions::repo,
    errors::{internal, ApiError},
    state::AppState,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard/stats", get(stats))
}

#[instrument(skip(state))]
pub async fn stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DashboardStats>, ApiError> {
    let user = current_user(&state, user_id).await?;
    let now = OffsetDateTime::now_utc();
    let from = window_start(now);
    let to = now + time::Duration::seconds(1);

    let (total, days, workouts, diets) = tokio::try_join!(
        repo::count_workout_completions(&state.db, &user.email),
        repo::workout_days(&state.db, &user.email),
        repo::list_workout_completions(&state.db, &user.email, from, to),
        repo::list_diet_completions(&state.db, &user.email, from, to),
    )
    .map_err(internal("load dashboard failed"))?;

    Ok(Json(build_stats(total, &days, &workouts, &diets, now)))
}
