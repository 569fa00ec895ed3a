use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::{
    error::{AppResult, DBError},
    forms::ArticleForm,
};

use super::UserId;

pub type ArticleId = i64;

const SELECT_ARTICLE: &str = "
    SELECT
        articles.id,
        articles.title,
        articles.body,
        articles.author_id,
        users.username AS author,
        articles.created_at
    FROM articles
    INNER JOIN users ON users.id = articles.author_id
";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub body: String,
    pub author_id: UserId,
    /// Username of the author.
    pub author: String,
    pub created_at: DateTime<Utc>,
}

pub async fn list_articles(pool: &SqlitePool) -> AppResult<Vec<Article>> {
    let articles = sqlx::query_as::<_, Article>(&format!("{SELECT_ARTICLE} ORDER BY articles.id"))
        .fetch_all(pool)
        .await?;
    Ok(articles)
}

pub async fn retrieve_article(pool: &SqlitePool, article_id: ArticleId) -> AppResult<Article> {
    let article =
        sqlx::query_as::<_, Article>(&format!("{SELECT_ARTICLE} WHERE articles.id = ?"))
            .bind(article_id)
            .fetch_optional(pool)
            .await?;

    article.ok_or_else(|| DBError::NotFound.into())
}

pub async fn create_article(
    pool: &SqlitePool,
    author_id: UserId,
    form: &ArticleForm,
) -> AppResult<Article> {
    let inserted = sqlx::query(
        "
        INSERT INTO articles (title, body, author_id, created_at)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(&form.title)
    .bind(&form.body)
    .bind(author_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    retrieve_article(pool, inserted.last_insert_rowid()).await
}

/// Only title and body are writable; the author never changes.
pub async fn update_article(
    pool: &SqlitePool,
    article_id: ArticleId,
    form: &ArticleForm,
) -> AppResult<Article> {
    let updated = sqlx::query("UPDATE articles SET title = ?, body = ? WHERE id = ?")
        .bind(&form.title)
        .bind(&form.body)
        .bind(article_id)
        .execute(pool)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(DBError::NotFound.into());
    }

    retrieve_article(pool, article_id).await
}

/// Comments go with the article through `ON DELETE CASCADE`.
pub async fn delete_article(pool: &SqlitePool, article_id: ArticleId) -> AppResult<()> {
    let deleted = sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(article_id)
        .execute(pool)
        .await?;

    match deleted.rows_affected() {
        0 => Err(DBError::NotFound.into()),
        _ => Ok(()),
    }
}
