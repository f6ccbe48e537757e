use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Session, User};

const USER_COLUMNS: &str =
    "id, email, username, name, image, password_hash, created_at, updated_at";

/// Fields a user may change on their own record.
#[derive(Debug, Clone)]
pub struct UserChanges<'a> {
    pub email: &'a str,
    pub username: Option<&'a str>,
    pub name: Option<&'a str>,
    pub image: Option<&'a str>,
}

pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &PgPool,
        email: &str,
        username: Option<&str>,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let sql = format!(
            "INSERT INTO users (email, username, password_hash) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(username)
            .bind(password_hash)
            .fetch_one(db)
            .await?;
        Ok(user)
    }

    /// Plans and completions follow an email change via ON UPDATE CASCADE.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        changes: &UserChanges<'_>,
    ) -> anyhow::Result<Option<User>> {
        let sql = format!(
            "UPDATE users SET email = $2, username = $3, name = $4, image = $5, updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.email)
            .bind(changes.username)
            .bind(changes.name)
            .bind(changes.image)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    /// Deletes the user; every owned row goes with it through FK cascades.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("delete user")?;
        Ok(res.rows_affected() > 0)
    }
}

pub async fn create_session(
    db: &PgPool,
    user_id: Uuid,
    session_token: &str,
    expires: OffsetDateTime,
) -> anyhow::Result<Session> {
    sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (session_token, user_id, expires)
        VALUES ($1, $2, $3)
        RETURNING id, session_token, user_id, expires
        "#,
    )
    .bind(session_token)
    .bind(user_id)
    .bind(expires)
    .fetch_one(db)
    .await
    .context("insert session")
}

/// Removes the session and returns it if it was still valid, so a refresh
/// token can only be redeemed once.
pub async fn take_live_session(
    db: &PgPool,
    user_id: Uuid,
    session_token: &str,
) -> anyhow::Result<Option<Session>> {
    sqlx::query_as::<_, Session>(
        r#"
        DELETE FROM sessions
         WHERE session_token = $1 AND user_id = $2 AND expires > now()
        RETURNING id, session_token, user_id, expires
        "#,
    )
    .bind(session_token)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("take session")
}

pub async fn delete_session(db: &PgPool, session_token: &str) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE session_token = $1")
        .bind(session_token)
        .execute(db)
        .await
        .context("delete session")?;
    Ok(())
}
