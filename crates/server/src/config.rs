use std::{env, fmt::Display, ops::RangeInclusive, str::FromStr};

use secrecy::SecretString;
use services::services::auth::DEFAULT_COST;
use thiserror::Error;
use tracing::warn;

const DEV_JWT_SECRET: &str = "maize-dev-secret-change-me";
/// Up to one year.
const TOKEN_TTL_HOURS: RangeInclusive<i64> = 1..=8760;
const BCRYPT_COST: RangeInclusive<u32> = 4..=31;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Runtime settings read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: SecretString,
    pub token_ttl_hours: i64,
    pub products_per_page: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                warn!("JWT_SECRET not set, using the development default");
                DEV_JWT_SECRET.to_string()
            }
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://maize.db".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8000)?,
            jwt_secret: SecretString::from(jwt_secret),
            token_ttl_hours: bounded("TOKEN_TTL_HOURS", 24, TOKEN_TTL_HOURS)?,
            products_per_page: parsed("PRODUCTS_PER_PAGE", 15)?,
            bcrypt_cost: bounded("BCRYPT_COST", DEFAULT_COST, BCRYPT_COST)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parsed<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    parse_value(var, env::var(var).ok(), default)
}

fn bounded<T>(var: &'static str, default: T, range: RangeInclusive<T>) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Display,
{
    check_range(var, parsed(var, default)?, &range)
}

fn parse_value<T: FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

fn check_range<T>(
    var: &'static str,
    value: T,
    range: &RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
        })
    }
}
