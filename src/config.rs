// src/config.rs

use std::env;

use dotenvy::dotenv;
use thiserror::Error;

const DEFAULT_JWT_EXPIRATION: u64 = 3600;
const DEFAULT_APP_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    /// Lifetime in seconds of tokens signed by [`crate::utils::jwt::sign_jwt`].
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub app_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let database_max_connections =
            parsed_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let jwt_expiration = parsed_or("JWT_EXPIRATION", DEFAULT_JWT_EXPIRATION)?;
        let app_port = parsed_or("APP_PORT", DEFAULT_APP_PORT)?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_expiration,
            rust_log,
            app_port,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parsed_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_or_falls_back_when_unset() {
        let value: u16 = parsed_or("QUIZBOARD_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_missing_error_names_the_key() {
        let err = required("QUIZBOARD_TEST_UNSET_SECRET").unwrap_err();
        assert_eq!(err.to_string(), "QUIZBOARD_TEST_UNSET_SECRET must be set");
    }
}
