use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest, RegisterResponse},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::{self, is_unique_violation},
        repo_types::User,
        services::{current_user, issue_tokens},
        validation::{is_valid_email, is_valid_username, normalize_email, MIN_PASSWORD_LEN},
    },
    errors::{internal, ApiError},
    extractors::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    payload.email = normalize_email(&payload.email);
    let username = payload
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::bad_request("Invalid email"));
    }
    if let Some(u) = username {
        if !is_valid_username(u) {
            warn!(username = %u, "invalid username");
            return Err(ApiError::bad_request(
                "Username must be 3-32 letters, digits or underscores",
            ));
        }
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::bad_request("Password too short"));
    }

    match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(_)) => {
            warn!(email = %payload.email, "email already registered");
            return Err(ApiError::Conflict("User with this email already exists".into()));
        }
        Ok(None) => {}
        Err(e) => return Err(internal("find_by_email failed")(e)),
    }
    if let Some(u) = username {
        match User::find_by_username(&state.db, u).await {
            Ok(Some(_)) => {
                warn!(username = %u, "username taken");
                return Err(ApiError::Conflict("User with this username already exists".into()));
            }
            Ok(None) => {}
            Err(e) => return Err(internal("find_by_username failed")(e)),
        }
    }

    let hash = hash_password(&payload.password).map_err(internal("hash_password failed"))?;

    let user = match User::create(&state.db, &payload.email, username, &hash).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %payload.email, "registration raced with another signup");
            return Err(ApiError::Conflict("User with this email already exists".into()));
        }
        Err(e) => return Err(internal("create user failed")(e)),
    };

    let keys = JwtKeys::from_ref(&state);
    let auth = issue_tokens(&state, &keys, &user)
        .await
        .map_err(internal("issue tokens failed"))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully!",
            auth,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::bad_request("Invalid email"));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
        Err(e) => return Err(internal("find_by_email failed")(e)),
    };

    let Some(hash) = user.password_hash.as_deref() else {
        warn!(user_id = %user.id, "login for account without password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let ok = verify_password(&payload.password, hash).map_err(internal("verify_password failed"))?;
    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let keys = JwtKeys::from_ref(&state);
    let auth = issue_tokens(&state, &keys, &user)
        .await
        .map_err(internal("issue tokens failed"))?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(auth))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let (claims, sid) = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        ApiError::unauthorized("Invalid refresh token")
    })?;

    let session = repo::take_live_session(&state.db, claims.sub, &sid)
        .await
        .map_err(internal("take session failed"))?;
    if session.is_none() {
        warn!(user_id = %claims.sub, "refresh for unknown or expired session");
        return Err(ApiError::unauthorized("Session expired"));
    }

    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(internal("find_by_id failed"))?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    let auth = issue_tokens(&state, &keys, &user)
        .await
        .map_err(internal("issue tokens failed"))?;
    Ok(Json(auth))
}

#[instrument(skip(state, payload))]
pub async fn logout(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> Result<StatusCode, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let (claims, sid) = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| ApiError::unauthorized("Invalid refresh token"))?;

    repo::delete_session(&state.db, &sid)
        .await
        .map_err(internal("delete session failed"))?;
    info!(user_id = %claims.sub, "user logged out");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = current_user(&state, user_id).await?;
    Ok(Json(PublicUser::from(&user)))
}
