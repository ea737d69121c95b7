// src/config/mod.rs
// Central configuration for the advisor service

mod advisor;
mod helpers;
mod nlu;
mod server;

pub use advisor::AdvisorConfig;
pub use nlu::NluConfig;
pub use server::{DatabaseConfig, LoggingConfig, ServerConfig};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub static CONFIG: Lazy<TellerConfig> = Lazy::new(TellerConfig::from_env);

/// Main configuration structure - composes all domain configs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TellerConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub nlu: NluConfig,
    pub advisor: AdvisorConfig,
}

impl TellerConfig {
    pub fn from_env() -> Self {
        // Don't panic if .env doesn't exist (for production)
        dotenvy::dotenv().ok();

        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            logging: LoggingConfig::from_env(),
            nlu: NluConfig::from_env(),
            advisor: AdvisorConfig::from_env(),
        }
    }
}
