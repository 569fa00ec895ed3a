#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use newsroom::{
    build_router,
    db::{self, Article, User},
    forms::ArticleForm,
    AppState, Config,
};
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .expect("location header")
            .to_str()
            .expect("ascii location")
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::new("sqlite::memory:", "test-secret");
        let pool = db::connect(&config.database_url)
            .await
            .expect("connect sqlite");
        db::prepare_db(&pool).await.expect("create schema");

        let state = AppState::new(pool, &config);
        let router = build_router(state.clone(), &config);
        Self { router, state }
    }

    /// A stored user and a token for them. The password hash is a placeholder,
    /// so these users cannot log in through the form.
    pub async fn user(&self, username: &str) -> (User, String) {
        let user = db::create_user(
            &self.state.pool,
            username,
            &format!("{username}@example.com"),
            "placeholder-hash",
        )
        .await
        .expect("create user");
        let token = self.state.issue_token(user.id).expect("issue token");
        (user, token)
    }

    pub async fn article(&self, author: &User, title: &str, body: &str) -> Article {
        let form = ArticleForm {
            title: title.to_string(),
            body: body.to_string(),
        };
        db::create_article(&self.state.pool, author.id, &form)
            .await
            .expect("create article")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn post_form(&self, path: &str, token: Option<&str>, form: &str) -> TestResponse {
        self.send(Method::POST, path, token, Some(form)).await
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        form: Option<&str>,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Token {token}"));
        }
        let body = match form {
            Some(form) => {
                request = request.header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                );
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).expect("build request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
