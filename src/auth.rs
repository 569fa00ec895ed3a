use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{headers::Authorization, TypedHeader};

use crate::{
    db::{self, Article, User, UserId},
    error::{AppError, AppResult, DBError},
    utils::jwt::{self, JWTToken},
    AppState,
};

/// The authenticated requester.
///
/// Extracting it is the login-required check: a missing, malformed or
/// expired token, or one naming a user that no longer exists, rejects the
/// request with a redirect to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> AppResult<Self> {
        let next = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        let Ok(TypedHeader(Authorization(token))) =
            TypedHeader::<Authorization<JWTToken>>::from_request_parts(parts, state).await
        else {
            return Err(AppError::LoginRequired(next));
        };

        let user_id = match jwt::verify_token(&token.0, &state.decoding_key) {
            Ok(user_id) => user_id,
            Err(err) => {
                tracing::debug!(error = ?err, "rejecting token");
                return Err(AppError::LoginRequired(next));
            }
        };

        match db::get_user(&state.pool, user_id).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(AppError::DBError(DBError::NotFound)) => Err(AppError::LoginRequired(next)),
            Err(err) => Err(err),
        }
    }
}

/// Something with an author, whose changes only that author may make.
pub trait Authored {
    fn author_id(&self) -> UserId;
}

impl Authored for Article {
    fn author_id(&self) -> UserId {
        self.author_id
    }
}

impl CurrentUser {
    pub fn id(&self) -> UserId {
        self.0.id
    }

    pub fn is_author_of(&self, object: &impl Authored) -> bool {
        object.author_id() == self.id()
    }

    pub fn ensure_author_of(&self, object: &impl Authored) -> AppResult<()> {
        if !self.is_author_of(object) {
            return Err(AppError::Forbidden("only the author may change this article"));
        }
        Ok(())
    }
}
