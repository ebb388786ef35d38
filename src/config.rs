// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub request_timeout: Duration,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = parse_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 5000)))?;
        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 10u32)?;
        let timeout_secs = parse_or("REQUEST_TIMEOUT_SECS", 30u64)?;

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        Ok(Self {
            database_url,
            rust_log,
            bind_addr,
            max_connections,
            request_timeout: Duration::from_secs(timeout_secs),
            log_dir,
        })
    }

    /// Configuration used by the integration tests: everything defaulted
    /// except the database URL.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            rust_log: "error".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            max_connections: 2,
            request_timeout: Duration::from_secs(30),
            log_dir: "logs".to_string(),
        }
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_database_keeps_url_and_defaults() {
        let config = Config::for_database("postgres://localhost/forum");
        assert_eq!(config.database_url, "postgres://localhost/forum");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.bind_addr.port(), 0);
    }

    #[test]
    fn parse_or_falls_back_when_unset() {
        let value: u32 = parse_or("FORUM_TEST_SURELY_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn config_error_messages_name_the_variable() {
        let missing = ConfigError::Missing("DATABASE_URL");
        assert_eq!(missing.to_string(), "DATABASE_URL must be set");

        let invalid = ConfigError::Invalid {
            name: "BIND_ADDR",
            value: "nowhere".to_string(),
        };
        assert_eq!(invalid.to_string(), "BIND_ADDR has an invalid value: nowhere");
    }
}
