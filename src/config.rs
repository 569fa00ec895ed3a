use std::env;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://newsroom.db";
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;
const MAX_TOKEN_TTL_DAYS: i64 = 3650;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Requests admitted per window by the optional global rate limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub requests: u64,
    pub per: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub rate_limit: Option<RateLimit>,
}

impl Config {
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            token_ttl: chrono::Duration::days(DEFAULT_TOKEN_TTL_DAYS),
            rate_limit: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("NEWSROOM_JWT_SECRET")
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::Missing("NEWSROOM_JWT_SECRET"))?;

        let token_ttl_days = parse_or("NEWSROOM_TOKEN_TTL_DAYS", &lookup, DEFAULT_TOKEN_TTL_DAYS)?;
        if !(1..=MAX_TOKEN_TTL_DAYS).contains(&token_ttl_days) {
            return Err(ConfigError::Invalid {
                name: "NEWSROOM_TOKEN_TTL_DAYS",
                value: token_ttl_days.to_string(),
            });
        }

        let rate_limit = match lookup("NEWSROOM_RATE_LIMIT_PER_SEC") {
            None => None,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) | Err(_) => {
                    return Err(ConfigError::Invalid {
                        name: "NEWSROOM_RATE_LIMIT_PER_SEC",
                        value: raw,
                    })
                }
                Ok(requests) => Some(RateLimit {
                    requests,
                    per: Duration::from_secs(1),
                }),
            },
        };

        Ok(Self {
            bind_addr: lookup("NEWSROOM_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            token_ttl: chrono::Duration::days(token_ttl_days),
            rate_limit,
        })
    }
}

fn parse_or(
    name: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: i64,
) -> Result<i64, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

pub fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn secret_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("NEWSROOM_JWT_SECRET")));
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("NEWSROOM_JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.bind_addr, DEFAULT_BIND);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.token_ttl, chrono::Duration::days(30));
        assert_eq!(config.rate_limit, None);
    }

    #[test]
    fn rate_limit_is_parsed_and_checked() {
        let config = Config::from_lookup(lookup(&[
            ("NEWSROOM_JWT_SECRET", "s3cret"),
            ("NEWSROOM_RATE_LIMIT_PER_SEC", "5"),
        ]))
        .unwrap();
        assert_eq!(
            config.rate_limit,
            Some(RateLimit {
                requests: 5,
                per: Duration::from_secs(1)
            })
        );

        let err = Config::from_lookup(lookup(&[
            ("NEWSROOM_JWT_SECRET", "s3cret"),
            ("NEWSROOM_RATE_LIMIT_PER_SEC", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn bad_ttl_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("NEWSROOM_JWT_SECRET", "s3cret"),
            ("NEWSROOM_TOKEN_TTL_DAYS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "NEWSROOM_TOKEN_TTL_DAYS",
                ..
            }
        ));
    }
}
