use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

pub(crate) fn parse_environment(raw: &str) -> Result<Environment, ConfigError> {
    match raw {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MEALMAP_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub geoapify_api_key: String,
    pub geoapify_base_url: String,
    pub places_timeout_secs: u64,
    pub cache_dir: PathBuf,
    pub cache_retention_hours: u64,
    pub openrice_base_url: String,
    pub scraper_headless: bool,
    pub scraper_page_timeout_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_inter_request_delay_ms: u64,
    pub scraper_max_concurrent: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("geoapify_api_key", &"[redacted]")
            .field("geoapify_base_url", &self.geoapify_base_url)
            .field("places_timeout_secs", &self.places_timeout_secs)
            .field("cache_dir", &self.cache_dir)
            .field("cache_retention_hours", &self.cache_retention_hours)
            .field("openrice_base_url", &self.openrice_base_url)
            .field("scraper_headless", &self.scraper_headless)
            .field("scraper_page_timeout_ms", &self.scraper_page_timeout_ms)
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_inter_request_delay_ms",
                &self.scraper_inter_request_delay_ms,
            )
            .field("scraper_max_concurrent", &self.scraper_max_concurrent)
            .finish()
    }
}
