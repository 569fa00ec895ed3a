//! A small article/comment service: authenticated listing, per-article
//! detail pages that accept comments, and author-only editing.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod routes;
pub mod utils;

use axum::extract::FromRef;
use jsonwebtoken::{DecodingKey, EncodingKey};
use sqlx::SqlitePool;

pub use config::Config;
pub use routes::build_router;

use crate::{db::UserId, error::AppResult, utils::jwt};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    encoding_key: EncodingKey,
    pub(crate) decoding_key: DecodingKey,
    token_ttl: chrono::Duration,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            pool,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_ttl: config.token_ttl,
        }
    }

    /// Signs a login token for `user_id`, valid for the configured lifetime.
    pub fn issue_token(&self, user_id: UserId) -> AppResult<String> {
        jwt::generate_jwt(user_id, &self.encoding_key, self.token_ttl)
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> SqlitePool {
        app_state.pool.clone()
    }
}
