//! Environment-driven configuration. A `.env` file is honored in
//! development; real environment variables always win.

use crate::error::ConfigError;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub env: String,
    pub db: DbConfig,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub dsn: String,
    pub max_connections: u32,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(Config {
            port: parse_var("PORT", 4000)?,
            env: std::env::var("ENV").unwrap_or_else(|_| "development".to_string()),
            db: DbConfig {
                dsn: std::env::var("MARQUEE_DB_DSN")
                    .map_err(|_| ConfigError::Missing("MARQUEE_DB_DSN"))?,
                max_connections: parse_var("DB_MAX_CONNECTIONS", 25)?,
                idle_timeout: Duration::from_secs(parse_var("DB_IDLE_TIMEOUT_SECS", 900)?),
                acquire_timeout: Duration::from_secs(parse_var("DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
