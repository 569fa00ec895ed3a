use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    api::{found, render, rerender, FormData},
    db::{self, User},
    error::{AppError, AppResult},
    forms::{self, BoundForm, LoginForm, SignupForm},
    routes::{ARTICLE_LIST_URL, LOGIN_URL},
    utils::hasher,
    AppState,
};

// ================================================= LOGIN ================================================= //

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    next: Option<String>,
}

impl NextQuery {
    /// Where to go after logging in. Only same-site paths are honored;
    /// browsers read `//host` and `/\host` as another site.
    fn target(self) -> String {
        match self.next {
            Some(next) if is_local_path(&next) => next,
            _ => ARTICLE_LIST_URL.to_string(),
        }
    }
}

fn is_local_path(next: &str) -> bool {
    let mut chars = next.chars();
    chars.next() == Some('/') && !matches!(chars.next(), Some('/' | '\\'))
}

#[derive(Debug, Serialize)]
struct LoggedIn {
    #[serde(flatten)]
    user: User,
    token: String,
}

// GET /accounts/login/
pub async fn login_form(Query(query): Query<NextQuery>) -> Response {
    render(json!({
        "form": BoundForm::unbound(LoginForm::default()),
        "next": query.target(),
    }))
}

// POST /accounts/login/
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    FormData(form): FormData<LoginForm>,
) -> AppResult<Response> {
    let form = match forms::bind(form) {
        Ok(form) => form,
        Err(invalid) => {
            return Ok(rerender(json!({ "form": invalid, "next": query.target() })));
        }
    };

    let Some(user) = db::find_user_by_username(&state.pool, &form.username).await? else {
        return Err(AppError::Forbidden("username or password is invalid"));
    };

    if !hasher::verify_password(&user.hash, &form.password)? {
        tracing::debug!(user_id = user.id, "wrong password");
        return Err(AppError::Forbidden("username or password is invalid"));
    }

    let token = state.issue_token(user.id)?;
    tracing::info!(user_id = user.id, "user logged in");

    let user = LoggedIn { user, token };
    Ok(Json(json!({ "user": user, "next": query.target() })).into_response())
}

// ================================================= SIGNUP ================================================= //

// GET /accounts/signup/
pub async fn signup_form() -> Response {
    render(json!({ "form": BoundForm::unbound(SignupForm::default()) }))
}

// POST /accounts/signup/
pub async fn signup(
    State(pool): State<SqlitePool>,
    FormData(form): FormData<SignupForm>,
) -> AppResult<Response> {
    let form = match forms::bind(form) {
        Ok(form) => form,
        Err(invalid) => return Ok(rerender(json!({ "form": invalid }))),
    };

    let hash = hasher::hash_password(&form.password)?;
    let user = db::create_user(&pool, &form.username, &form.email, &hash).await?;
    tracing::info!(user_id = user.id, "user registered");

    Ok(found(LOGIN_URL))
}
