pub mod app_config;
pub mod config;
pub mod pricing;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use pricing::{validate_cost, InvalidCost, PricePolicy, WeightBand};

use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
