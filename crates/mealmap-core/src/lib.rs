pub mod app_config;
pub mod classify;
mod config;
pub mod enrichment;
pub mod restaurant;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use classify::{classify, Classification, GENERAL_CUISINE};
pub use config::{load_app_config, load_app_config_from_env};
pub use enrichment::{EnrichmentRecord, RestaurantImage, ReviewStats};
pub use restaurant::{Position, RestaurantRecord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
