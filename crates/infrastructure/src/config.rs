use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use domain::{DomainError, SeedPolicy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which document store the bootstrap writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongodb,
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::Mongodb),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(DomainError::InvalidConfiguration(format!(
                "Unknown store backend: {other}"
            ))),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    /// Connection string, used by the MongoDB backend
    pub uri: String,
    /// Logical database name
    pub name: String,
    pub collection: String,
    /// Directory holding `<name>.db` for the SQLite backend, or `:memory:`
    pub data_dir: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub policy: SeedPolicy,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BootstrapConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl BootstrapConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Self::file_layers(config_dir, &run_mode)?
            // Environment variables (e.g. CRAGCROWD__DATABASE__URI=mongodb://mongo:27017)
            .add_source(Environment::with_prefix("CRAGCROWD").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Defaults and config files only, the process environment is ignored
    pub fn load_files(config_dir: &str, run_mode: &str) -> Result<Self, ConfigError> {
        Self::file_layers(config_dir, run_mode)?
            .build()?
            .try_deserialize()
    }

    fn file_layers(
        config_dir: &str,
        run_mode: &str,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("database.backend", "mongodb")?
            .set_default("database.uri", "mongodb://localhost:27017")?
            .set_default("database.name", "cragcrowd")?
            .set_default("database.collection", "sensor_readings")?
            .set_default("database.data_dir", "data")?
            .set_default("seed.policy", "always")?
            // Shipped defaults, e.g. config/default.toml
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false)))
    }
}
