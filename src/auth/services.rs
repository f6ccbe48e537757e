use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{dto::AuthResponse, jwt::JwtKeys, repo, repo_types::User};
use crate::{
    errors::{internal, ApiError},
    state::AppState,
};

/// Opens a new server-side session and issues the token pair bound to it.
pub async fn issue_tokens(
    state: &AppState,
    keys: &JwtKeys,
    user: &User,
) -> anyhow::Result<AuthResponse> {
    let session_token = Uuid::new_v4().simple().to_string();
    let expires =
        OffsetDateTime::now_utc() + TimeDuration::seconds(keys.refresh_ttl.as_secs() as i64);
    repo::create_session(&state.db, user.id, &session_token, expires).await?;
    debug!(user_id = %user.id, "session opened");

    Ok(AuthResponse {
        access_token: keys.sign_access(user.id)?,
        refresh_token: keys.sign_refresh(user.id, &session_token)?,
        user: user.into(),
    })
}

/// Loads the record behind an authenticated user id. A valid token for a
/// deleted user is treated as unauthenticated.
pub async fn current_user(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal("find_by_id failed"))?
        .ok_or_else(|| {
            warn!(%user_id, "token for missing user");
            ApiError::unauthorized("Unauthorized")
        })
}
