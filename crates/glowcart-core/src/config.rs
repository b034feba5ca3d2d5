use crate::app_config::{AppConfig, Environment};
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
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup, without
/// `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let shop_url = require("GLOWCART_SHOP_URL")?;
    if !shop_url.starts_with("http://") && !shop_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "GLOWCART_SHOP_URL".to_string(),
            reason: "must start with http:// or https://".to_string(),
        });
    }

    let env = parse_environment(&or_default("GLOWCART_ENV", "development"));
    let bind_addr = parse_addr("GLOWCART_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("GLOWCART_LOG_LEVEL", "info");

    let catalog_page_size = parse_u32("GLOWCART_CATALOG_PAGE_SIZE", "250")?;
    let request_timeout_secs = parse_u64("GLOWCART_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("GLOWCART_USER_AGENT", "glowcart/0.1 (storefront)");
    let max_retries = parse_u32("GLOWCART_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("GLOWCART_RETRY_BACKOFF_BASE_SECS", "1")?;
    let inter_request_delay_ms = parse_u64("GLOWCART_INTER_REQUEST_DELAY_MS", "250")?;
    let catalog_refresh_secs = parse_u64("GLOWCART_CATALOG_REFRESH_SECS", "300")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        shop_url,
        catalog_page_size,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        inter_request_delay_ms,
        catalog_refresh_secs,
    })
}

/// Unrecognized values fall back to development rather than failing startup.
fn parse_environment(raw: &str) -> Environment {
    match raw.to_lowercase().as_str() {
        "production" | "prod" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
