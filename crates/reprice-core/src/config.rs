use rust_decimal::Decimal;

use crate::app_config::AppConfig;
use crate::pricing::PricePolicy;
use crate::ConfigError;

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
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        let value = lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))?;
        if value.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "value is empty".to_string(),
            });
        }
        Ok(value.trim().to_string())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_multiplier = |var: &str, default: Decimal| -> Result<Decimal, ConfigError> {
        let Ok(raw) = lookup(var) else {
            return Ok(default);
        };
        let value = raw
            .trim()
            .parse::<Decimal>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if value <= Decimal::ZERO {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("multiplier must be positive, got {value}"),
            });
        }
        Ok(value)
    };

    let store = require("SHOPIFY_STORE")?;
    let access_token = require("SHOPIFY_TOKEN")?;

    let api_version = or_default("REPRICE_API_VERSION", "2024-04");
    let write_delay_ms = parse_u64("REPRICE_WRITE_DELAY_MS", "600")?;
    let request_timeout_secs = parse_u64("REPRICE_REQUEST_TIMEOUT_SECS", "30")?;
    let log_level = or_default("REPRICE_LOG_LEVEL", "info");

    let default_policy = PricePolicy::default();
    let light_multiplier =
        parse_multiplier("REPRICE_LIGHT_MULTIPLIER", default_policy.light_multiplier)?;

    Ok(AppConfig {
        store,
        access_token,
        api_version,
        write_delay_ms,
        request_timeout_secs,
        log_level,
        price_policy: PricePolicy {
            light_multiplier,
            ..default_policy
        },
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
