//! Infrastructure layer - Configuration and database adapters

pub mod config;
pub mod database;

pub use config::{BootstrapConfig, DatabaseConfig, SeedConfig, StoreBackend};
pub use database::{MongoReadingStore, SqliteReadingStore, StoreFactory};
