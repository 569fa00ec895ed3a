use axum::{
    extract::rejection::{FormRejection, PathRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::routes;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum DBError {
    #[error("User is already registered")]
    AlreadyRegistered,

    #[error("Not Found")]
    NotFound,
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Any error: {0:?}")]
    Anyhow(#[from] anyhow::Error),

    #[error("DB Error: {0:?}")]
    DBError(#[from] DBError),

    #[error("Forbidden request: {0}")]
    Forbidden(&'static str),

    /// Carries the path and query the requester asked for, so the login
    /// page can send them back afterwards.
    #[error("Login required for {0}")]
    LoginRequired(String),

    #[error("SQL failed: {0:?}")]
    Sqlx(#[from] sqlx::Error),

    #[error("JWT error: {0:?}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid form: {0}")]
    InvalidForm(#[from] FormRejection),
}

// A path segment that does not parse cannot name anything.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection, "unparseable path");
        AppError::DBError(DBError::NotFound)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::LoginRequired(_) => StatusCode::FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::DBError(DBError::NotFound) => StatusCode::NOT_FOUND,
            AppError::DBError(DBError::AlreadyRegistered) => StatusCode::CONFLICT,
            AppError::InvalidForm(rejection) => rejection.status(),
            AppError::JwtError(_) | AppError::Sqlx(_) | AppError::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        if let AppError::LoginRequired(next) = &self {
            let location = routes::login_redirect_url(next);
            return (status, [(header::LOCATION, location)]).into_response();
        }

        let error_message = match &self {
            AppError::Forbidden(reason) => Some(reason.to_string()),
            AppError::DBError(db_error) => Some(db_error.to_string()),
            AppError::InvalidForm(rejection) => Some(rejection.body_text()),
            _ => None,
        };

        let body = Json(json!({
            "error": error_message
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Error").to_string()),
        }));

        (status, body).into_response()
    }
}
