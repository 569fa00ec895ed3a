pub mod articles;
pub mod auth;
pub mod comments;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    db::ArticleId,
    error::{AppError, AppResult},
};

/// The `:pk` path segment. Anything that does not parse as an article id
/// cannot name an article, so it is rejected as not found.
#[derive(Debug, Clone, Copy)]
pub struct ArticlePk(pub ArticleId);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ArticlePk {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Path(pk) = Path::<ArticleId>::from_request_parts(parts, state).await?;
        Ok(ArticlePk(pk))
    }
}

/// A urlencoded form body whose rejections answer with the JSON error body.
#[derive(Debug)]
pub struct FormData<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FormData<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Form(data) = Form::<T>::from_request(req, state).await?;
        Ok(FormData(data))
    }
}

/// `302 Found` to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Renders a page context.
pub fn render(context: Value) -> Response {
    Json(context).into_response()
}

/// Renders a page context again after its form failed validation.
pub fn rerender(context: Value) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(context)).into_response()
}
