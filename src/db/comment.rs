use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, AppResult, DBError};

use super::ArticleId;

pub type CommentId = i64;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub article_id: ArticleId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// The parent is always an article id resolved by the caller, never form input.
pub async fn create_comment(
    pool: &SqlitePool,
    article_id: ArticleId,
    content: &str,
) -> AppResult<Comment> {
    let inserted = sqlx::query(
        "
        INSERT INTO comments (content, article_id, created_at)
        VALUES (?, ?, ?)
        ",
    )
    .bind(content)
    .bind(article_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
        .bind(inserted.last_insert_rowid())
        .fetch_optional(pool)
        .await?;

    comment.ok_or(AppError::DBError(DBError::NotFound))
}

pub async fn list_comments(pool: &SqlitePool, article_id: ArticleId) -> AppResult<Vec<Comment>> {
    let comments = sqlx::query_as::<_, Comment>(
        "
        SELECT * FROM comments
        WHERE article_id = ?
        ORDER BY id
        ",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}
