//! Layered configuration.
//!
//! # Sources (in priority order)
//!
//! 1. Environment variables (prefix: `SHACK_`, `__` between nested keys)
//! 2. TOML file named by `SHACK_CONFIG`, or `shack.toml` in the working directory
//! 3. Built-in defaults
//!
//! ```bash
//! SHACK_SERVER__PORT=8080 SHACK_STORAGE__BACKEND=memory shack-o-target
//! ```

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::db::NewUser;

pub const CONFIG_PATH_ENV: &str = "SHACK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "shack.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,
    /// Only read by the sqlite backend.
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Sqlite,
            database_url: "sqlite://shack.db".to_string(),
        }
    }
}

/// The sample record inserted at startup when its username is absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub username: String,
    pub password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "password123".to_string(),
        }
    }
}

impl SeedConfig {
    pub fn to_new_user(&self) -> NewUser {
        NewUser::new(self.username.clone(), self.password.clone())
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".to_string()));
        }
        if self.seed.username.is_empty() || self.seed.password.is_empty() {
            return Err(ConfigError::Invalid(
                "seed.username and seed.password must not be empty".to_string(),
            ));
        }
        if self.storage.backend == Backend::Sqlite && self.storage.database_url.is_empty() {
            return Err(ConfigError::Invalid(
                "storage.database_url is required for the sqlite backend".to_string(),
            ));
        }
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SHACK")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from the optional file and the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = Config::builder()
        .add_source(File::new(&path, FileFormat::Toml).required(false))
        .add_source(environment())
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}
