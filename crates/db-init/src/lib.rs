use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{debug, info};

use application::{BootstrapReport, Bootstrapper};
use domain::{CollectionSpec, SeedPolicy};
use infrastructure::{BootstrapConfig, StoreBackend, StoreFactory};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Creates the CragCrowd readings collection, its indexes and sample data", long_about = None)]
pub struct Args {
    /// Path to config directory
    #[arg(long, default_value = "config")]
    pub config_dir: String,

    /// Override store backend (mongodb, sqlite)
    #[arg(long)]
    pub backend: Option<StoreBackend>,

    /// Override MongoDB connection string
    #[arg(long)]
    pub uri: Option<String>,

    /// Override database name
    #[arg(long)]
    pub database: Option<String>,

    /// Override collection name
    #[arg(long)]
    pub collection: Option<String>,

    /// Override SQLite data directory (`:memory:` for a throwaway database)
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Override seed policy (always, if-empty, skip)
    #[arg(long)]
    pub seed_policy: Option<SeedPolicy>,
}

impl Args {
    /// CLI values win over file and environment configuration
    pub fn apply_to(&self, config: &mut BootstrapConfig) {
        if let Some(backend) = self.backend {
            config.database.backend = backend;
        }
        if let Some(uri) = &self.uri {
            config.database.uri = uri.clone();
        }
        if let Some(database) = &self.database {
            config.database.name = database.clone();
        }
        if let Some(collection) = &self.collection {
            config.database.collection = collection.clone();
        }
        if let Some(data_dir) = &self.data_dir {
            config.database.data_dir = data_dir.clone();
        }
        if let Some(policy) = self.seed_policy {
            config.seed.policy = policy;
        }
    }
}

/// Load configuration from files and environment, then bootstrap.
pub async fn run(args: Args) -> Result<BootstrapReport> {
    info!("Initializing CragCrowd database...");

    let config = BootstrapConfig::load(&args.config_dir)
        .with_context(|| format!("Failed to load configuration from {}", args.config_dir))?;
    bootstrap(config, &args).await
}

/// Select the database, ensure schema, load seed data.
pub async fn bootstrap(mut config: BootstrapConfig, args: &Args) -> Result<BootstrapReport> {
    args.apply_to(&mut config);

    let store = StoreFactory::connect(&config.database)
        .await
        .context("Failed to select database")?;

    let bootstrapper = Bootstrapper::new(
        store,
        CollectionSpec::sensor_readings(config.database.collection.as_str()),
        config.seed.policy,
    );
    let report = bootstrapper
        .run(Utc::now())
        .await
        .context("Bootstrap failed")?;

    debug!(report = %report, "📊 Bootstrap summary");
    info!("CragCrowd database initialized successfully!");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure::{DatabaseConfig, SeedConfig};

    fn base_config() -> BootstrapConfig {
        BootstrapConfig {
            database: DatabaseConfig {
                backend: StoreBackend::Mongodb,
                uri: "mongodb://localhost:27017".to_string(),
                name: "cragcrowd".to_string(),
                collection: "sensor_readings".to_string(),
                data_dir: "data".to_string(),
            },
            seed: SeedConfig::default(),
        }
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "cragcrowd-db-init",
            "--backend",
            "sqlite",
            "--seed-policy",
            "if-empty",
            "--database",
            "cragcrowd_dev",
        ])
        .unwrap();

        assert_eq!(args.config_dir, "config");
        assert_eq!(args.backend, Some(StoreBackend::Sqlite));
        assert_eq!(args.seed_policy, Some(SeedPolicy::IfEmpty));
        assert_eq!(args.database.as_deref(), Some("cragcrowd_dev"));
    }

    #[test]
    fn test_invalid_seed_policy_rejected() {
        let result = Args::try_parse_from(["cragcrowd-db-init", "--seed-policy", "sometimes"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_applied() {
        let args = Args::try_parse_from([
            "cragcrowd-db-init",
            "--uri",
            "mongodb://mongo:27017",
            "--seed-policy",
            "skip",
        ])
        .unwrap();
        let mut config = base_config();

        args.apply_to(&mut config);

        assert_eq!(config.database.uri, "mongodb://mongo:27017");
        assert_eq!(config.seed.policy, SeedPolicy::Skip);
        assert_eq!(config.database.name, "cragcrowd");
        assert_eq!(config.database.backend, StoreBackend::Mongodb);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let args = Args::try_parse_from(["cragcrowd-db-init"]).unwrap();
        let mut config = base_config();

        args.apply_to(&mut config);

        assert_eq!(config.database.collection, "sensor_readings");
        assert_eq!(config.seed.policy, SeedPolicy::Always);
    }
}
