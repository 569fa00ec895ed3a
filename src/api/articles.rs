use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Json,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    api::{comments, found, render, rerender, ArticlePk, FormData},
    auth::CurrentUser,
    db::{self, retrieve_article},
    error::AppResult,
    forms::{self, ArticleForm, BoundForm},
    routes::{article_detail_url, ARTICLE_LIST_URL},
    AppState,
};

// GET /articles/
pub async fn article_list(
    State(pool): State<SqlitePool>,
    _user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let articles = db::list_articles(&pool).await?;
    Ok(Json(json!({ "articles": articles })))
}

// GET /articles/:pk/ and POST /articles/:pk/
//
// Reading the page and commenting on it share one URL; the method picks the behavior.
pub fn article_detail() -> MethodRouter<AppState> {
    get(comments::comment_get).post(comments::comment_post)
}

// GET /articles/new/
pub async fn article_new(_user: CurrentUser) -> Response {
    render(json!({ "form": BoundForm::unbound(ArticleForm::default()) }))
}

// POST /articles/new/
pub async fn article_create(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    FormData(form): FormData<ArticleForm>,
) -> AppResult<Response> {
    let form = match forms::bind(form) {
        Ok(form) => form,
        Err(invalid) => return Ok(rerender(json!({ "form": invalid }))),
    };

    // The author is always the requester, whatever the form carried.
    let article = db::create_article(&pool, user.id(), &form).await?;
    tracing::info!(article_id = article.id, author_id = user.id(), "article created");

    Ok(found(&article_detail_url(article.id)))
}

// GET /articles/:pk/edit/
pub async fn article_edit(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    ArticlePk(pk): ArticlePk,
) -> AppResult<Response> {
    let article = retrieve_article(&pool, pk).await?;
    user.ensure_author_of(&article)?;

    let form = BoundForm::unbound(ArticleForm::from(&article));
    Ok(render(json!({ "article": article, "form": form })))
}

// POST /articles/:pk/edit/
pub async fn article_update(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    ArticlePk(pk): ArticlePk,
    FormData(form): FormData<ArticleForm>,
) -> AppResult<Response> {
    let article = retrieve_article(&pool, pk).await?;
    user.ensure_author_of(&article)?;

    let form = match forms::bind(form) {
        Ok(form) => form,
        Err(invalid) => return Ok(rerender(json!({ "article": article, "form": invalid }))),
    };

    let article = db::update_article(&pool, article.id, &form).await?;
    tracing::info!(article_id = article.id, author_id = user.id(), "article updated");

    Ok(found(&article_detail_url(article.id)))
}

// GET /articles/:pk/delete/
pub async fn article_delete_confirm(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    ArticlePk(pk): ArticlePk,
) -> AppResult<Response> {
    let article = retrieve_article(&pool, pk).await?;
    user.ensure_author_of(&article)?;

    Ok(render(json!({ "article": article })))
}

// POST /articles/:pk/delete/
pub async fn article_delete(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    ArticlePk(pk): ArticlePk,
) -> AppResult<Response> {
    let article = retrieve_article(&pool, pk).await?;
    user.ensure_author_of(&article)?;

    db::delete_article(&pool, article.id).await?;
    tracing::info!(article_id = article.id, author_id = user.id(), "article deleted");

    Ok(found(ARTICLE_LIST_URL))
}
