use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, AppResult, DBError};

pub type UserId = i64;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub hash: String,
    pub created_at: DateTime<Utc>,
}

pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    hash: &str,
) -> AppResult<User> {
    let inserted = sqlx::query(
        "
        INSERT INTO users (username, email, hash, created_at)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(username)
    .bind(email)
    .bind(hash)
    .bind(Utc::now())
    .execute(pool)
    .await;

    let inserted = match inserted {
        Ok(inserted) => inserted,
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
            return Err(DBError::AlreadyRegistered.into())
        }
        Err(err) => return Err(err.into()),
    };

    get_user(pool, inserted.last_insert_rowid()).await
}

pub async fn get_user(pool: &SqlitePool, user_id: UserId) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    user.ok_or(AppError::DBError(DBError::NotFound))
}

pub async fn find_user_by_username(pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}
