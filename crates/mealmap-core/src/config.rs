use crate::app_config::{parse_environment, AppConfig};
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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
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
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<bool>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let geoapify_api_key = require("MEALMAP_GEOAPIFY_API_KEY")?;

    let env = parse_environment(&or_default("MEALMAP_ENV", "development"))?;

    let bind_addr = parse_addr("MEALMAP_BIND_ADDR", "0.0.0.0:4000")?;
    let log_level = or_default("MEALMAP_LOG_LEVEL", "info");
    let geoapify_base_url = or_default("MEALMAP_GEOAPIFY_BASE_URL", "https://api.geoapify.com");
    let places_timeout_secs = parse_u64("MEALMAP_PLACES_TIMEOUT_SECS", "10")?;

    let cache_dir = PathBuf::from(or_default("MEALMAP_CACHE_DIR", "./cache/openrice"));
    // 168 hours = the documented 7-day retention window.
    let cache_retention_hours = parse_u64("MEALMAP_CACHE_RETENTION_HOURS", "168")?;

    let openrice_base_url = or_default("MEALMAP_OPENRICE_BASE_URL", "https://www.openrice.com");
    let scraper_headless = parse_bool("MEALMAP_SCRAPER_HEADLESS", "true")?;
    let scraper_page_timeout_ms = parse_u64("MEALMAP_SCRAPER_PAGE_TIMEOUT_MS", "15000")?;
    let scraper_max_retries = parse_u32("MEALMAP_SCRAPER_MAX_RETRIES", "2")?;
    let scraper_inter_request_delay_ms =
        parse_u64("MEALMAP_SCRAPER_INTER_REQUEST_DELAY_MS", "750")?;
    let scraper_max_concurrent = parse_usize("MEALMAP_SCRAPER_MAX_CONCURRENT", "2")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        geoapify_api_key,
        geoapify_base_url,
        places_timeout_secs,
        cache_dir,
        cache_retention_hours,
        openrice_base_url,
        scraper_headless,
        scraper_page_timeout_ms,
        scraper_max_retries,
        scraper_inter_request_delay_ms,
        scraper_max_concurrent,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
