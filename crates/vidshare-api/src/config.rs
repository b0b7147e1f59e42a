//! Server configuration read from the environment.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_PERSISTENCE_TIMEOUT_MS: u64 = 5_000;

/// Runtime configuration for the API server.
#[derive(Clone)]
pub struct Config {
    /// `PostgreSQL` connection string (`DATABASE_URL`).
    pub database_url: String,
    /// Shared secret for bearer tokens (`JWT_SECRET`).
    pub jwt_secret: String,
    /// Bind host (`HOST`).
    pub host: String,
    /// Bind port (`PORT`).
    pub port: u16,
    /// Pool size (`DATABASE_MAX_CONNECTIONS`).
    pub database_max_connections: u32,
    /// Deadline for every event store call (`PERSISTENCE_TIMEOUT_MS`).
    pub persistence_timeout: Duration,
    /// Single allowed CORS origin (`CORS_ALLOWED_ORIGIN`); permissive when unset.
    pub cors_allowed_origin: Option<String>,
    /// OTLP collector endpoint (`OTEL_EXPORTER_OTLP_ENDPOINT`).
    pub otlp_endpoint: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"<redacted>")
            .field("jwt_secret", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_max_connections", &self.database_max_connections)
            .field("persistence_timeout", &self.persistence_timeout)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("otlp_endpoint", &self.otlp_endpoint)
            .finish()
    }
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            optional(key)
                .ok_or_else(|| AppError::Config(format!("{key} environment variable must be set")))
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            host: optional("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: parse_or(optional("PORT"), "PORT", DEFAULT_PORT)?,
            database_max_connections: parse_or(
                optional("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            persistence_timeout: Duration::from_millis(parse_or(
                optional("PERSISTENCE_TIMEOUT_MS"),
                "PERSISTENCE_TIMEOUT_MS",
                DEFAULT_PERSISTENCE_TIMEOUT_MS,
            )?),
            cors_allowed_origin: optional("CORS_ALLOWED_ORIGIN"),
            otlp_endpoint: optional("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a valid address.
    pub fn bind_address(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} must be valid: {e}"))),
    }
}
