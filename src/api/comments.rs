use axum::{extract::State, response::Response};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    api::{found, render, rerender, ArticlePk, FormData},
    auth::CurrentUser,
    db::{self, retrieve_article},
    error::AppResult,
    forms::{self, BoundForm, CommentForm},
    routes::article_detail_url,
};

// GET /articles/:pk/
pub async fn comment_get(
    State(pool): State<SqlitePool>,
    _user: CurrentUser,
    ArticlePk(pk): ArticlePk,
) -> AppResult<Response> {
    let article = retrieve_article(&pool, pk).await?;
    let comments = db::list_comments(&pool, article.id).await?;

    Ok(render(json!({
        "article": article,
        "comments": comments,
        "form": BoundForm::unbound(CommentForm::default()),
    })))
}

// POST /articles/:pk/
pub async fn comment_post(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    ArticlePk(pk): ArticlePk,
    FormData(form): FormData<CommentForm>,
) -> AppResult<Response> {
    let article = retrieve_article(&pool, pk).await?;

    let form = match forms::bind(form) {
        Ok(form) => form,
        Err(invalid) => {
            let comments = db::list_comments(&pool, article.id).await?;
            return Ok(rerender(json!({
                "article": article,
                "comments": comments,
                "form": invalid,
            })));
        }
    };

    let comment = db::create_comment(&pool, article.id, &form.content).await?;
    tracing::info!(
        comment_id = comment.id,
        article_id = article.id,
        user_id = user.id(),
        "comment added"
    );

    Ok(found(&article_detail_url(article.id)))
}
