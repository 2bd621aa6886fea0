mod mongo_store;
mod sqlite_store;

pub use mongo_store::{MongoReadingStore, index_model, reading_from_document, reading_to_document};
pub use sqlite_store::SqliteReadingStore;

use crate::config::{DatabaseConfig, StoreBackend};
use domain::{DomainError, ReadingStore};
use std::sync::Arc;
use tracing::debug;

/// Selects the configured database and hands back a store bound to it
pub struct StoreFactory;

impl StoreFactory {
    pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn ReadingStore>, DomainError> {
        debug!(backend = ?config.backend, database = %config.name, "Selecting database");

        match config.backend {
            StoreBackend::Mongodb => {
                let store = MongoReadingStore::connect(&config.uri, &config.name).await?;
                Ok(Arc::new(store) as Arc<dyn ReadingStore>)
            }
            StoreBackend::Sqlite => {
                let store = SqliteReadingStore::open(&config.data_dir, &config.name).await?;
                Ok(Arc::new(store) as Arc<dyn ReadingStore>)
            }
        }
    }
}
