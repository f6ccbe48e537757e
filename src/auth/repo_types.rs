use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>, // Argon2 hash; NULL for provider-only accounts
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Server-side session backing one refresh token.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub session_token: String,
    pub user_id: Uuid,
    pub expires: OffsetDateTime,
}
