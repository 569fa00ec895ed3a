use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    BoxError, Json, Router,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::json;
use tower::{buffer::BufferLayer, limit::RateLimitLayer, ServiceBuilder};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{api, config::Config, db::ArticleId, AppState};

pub const LOGIN_URL: &str = "/accounts/login/";
pub const ARTICLE_LIST_URL: &str = "/articles/";

// `next` keeps its slashes readable.
const NEXT_PARAM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn article_detail_url(article_id: ArticleId) -> String {
    format!("/articles/{article_id}/")
}

pub fn login_redirect_url(next: &str) -> String {
    format!("{LOGIN_URL}?next={}", utf8_percent_encode(next, NEXT_PARAM))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        // ==== ACCOUNTS ==== //
        .route(
            "/accounts/signup/",
            get(api::auth::signup_form).post(api::auth::signup),
        )
        .route(
            "/accounts/login/",
            get(api::auth::login_form).post(api::auth::login),
        )
        // ==== ARTICLES ==== //
        .route("/articles/", get(api::articles::article_list))
        .route(
            "/articles/new/",
            get(api::articles::article_new).post(api::articles::article_create),
        )
        .route("/articles/:pk/", api::articles::article_detail())
        .route(
            "/articles/:pk/edit/",
            get(api::articles::article_edit).post(api::articles::article_update),
        )
        .route(
            "/articles/:pk/delete/",
            get(api::articles::article_delete_confirm).post(api::articles::article_delete),
        )
        .fallback(handler_404)
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    match config.rate_limit {
        None => router,
        Some(limit) => router.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|err: BoxError| async move {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Unhandled error: {}", err),
                    )
                }))
                .layer(BufferLayer::new(1024))
                .layer(RateLimitLayer::new(limit.requests, limit.per)),
        ),
    }
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "nothing to see here" })),
    )
}
