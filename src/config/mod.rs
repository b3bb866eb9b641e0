//! Environment-driven process configuration

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::core::error::ConfigError;

/// Deployment environment, selected via `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl FromStr for AppEnv {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(AppEnv::Development),
            "production" => Ok(AppEnv::Production),
            other => Err(ConfigError::InvalidValue {
                name: "APP_ENV",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppEnv::Development => write!(f, "development"),
            AppEnv::Production => write!(f, "production"),
        }
    }
}

/// Connection settings for the process lifetime
#[derive(Debug, Clone)]
pub struct Config {
    pub nats_url: String,
    pub database_url: String,
    pub env: AppEnv,
}

impl Config {
    /// Load settings from the process environment.
    ///
    /// `NATS_URL` and `DATABASE_URL` are required. When either is
    /// missing, a `.env` file is loaded (if present, e.g. outside of
    /// containers) and the lookup retried. `APP_ENV` defaults to
    /// `development`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut nats_url = env::var("NATS_URL").ok().filter(|v| !v.is_empty());
        let mut database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());

        if nats_url.is_none() || database_url.is_none() {
            let _ = dotenvy::dotenv();
            nats_url = nats_url.or_else(|| env::var("NATS_URL").ok().filter(|v| !v.is_empty()));
            database_url =
                database_url.or_else(|| env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()));
        }

        let nats_url = nats_url.ok_or(ConfigError::MissingVar { name: "NATS_URL" })?;
        let database_url = database_url.ok_or(ConfigError::MissingVar {
            name: "DATABASE_URL",
        })?;

        let env = match env::var("APP_ENV") {
            Ok(value) if !value.is_empty() => value.parse()?,
            _ => AppEnv::Development,
        };

        Ok(Self {
            nats_url,
            database_url,
            env,
        })
    }
}
