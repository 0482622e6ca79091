use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Default distance-matrix endpoint.
pub const DEFAULT_DISTANCE_API_URL: &str =
    "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("SERVICEAREA_ENV", "development"))?;

    let bind_addr: SocketAddr = parse_as(
        "SERVICEAREA_BIND_ADDR",
        &or_default("SERVICEAREA_BIND_ADDR", "0.0.0.0:3000"),
    )?;
    let log_level = or_default("SERVICEAREA_LOG_LEVEL", "info");

    let db_max_connections = parse_as(
        "SERVICEAREA_DB_MAX_CONNECTIONS",
        &or_default("SERVICEAREA_DB_MAX_CONNECTIONS", "10"),
    )?;
    let db_min_connections = parse_as(
        "SERVICEAREA_DB_MIN_CONNECTIONS",
        &or_default("SERVICEAREA_DB_MIN_CONNECTIONS", "1"),
    )?;
    let db_acquire_timeout_secs = parse_as(
        "SERVICEAREA_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("SERVICEAREA_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    let distance_api_url = or_default("SERVICEAREA_DISTANCE_API_URL", DEFAULT_DISTANCE_API_URL);
    let distance_timeout_secs: u64 = parse_as(
        "SERVICEAREA_DISTANCE_TIMEOUT_SECS",
        &or_default("SERVICEAREA_DISTANCE_TIMEOUT_SECS", "30"),
    )?;
    if distance_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SERVICEAREA_DISTANCE_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let distance_max_retries = parse_as(
        "SERVICEAREA_DISTANCE_MAX_RETRIES",
        &or_default("SERVICEAREA_DISTANCE_MAX_RETRIES", "0"),
    )?;
    let distance_retry_backoff_ms = parse_as(
        "SERVICEAREA_DISTANCE_RETRY_BACKOFF_MS",
        &or_default("SERVICEAREA_DISTANCE_RETRY_BACKOFF_MS", "500"),
    )?;
    let rate_limit_per_minute: usize = parse_as(
        "SERVICEAREA_RATE_LIMIT_PER_MINUTE",
        &or_default("SERVICEAREA_RATE_LIMIT_PER_MINUTE", "120"),
    )?;
    if rate_limit_per_minute == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SERVICEAREA_RATE_LIMIT_PER_MINUTE".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        distance_api_url,
        distance_timeout_secs,
        distance_max_retries,
        distance_retry_backoff_ms,
        rate_limit_per_minute,
    })
}

fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SERVICEAREA_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
