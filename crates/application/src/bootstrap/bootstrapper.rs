use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use domain::{CollectionSpec, DomainError, ReadingStore, SeedPolicy, SeedSet};

use super::{BootstrapReport, SchemaOutcome};

/// One-shot initialization of the readings collection.
///
/// Steps run strictly in order and the first error aborts the run:
/// 1. ensure the collection exists
/// 2. ensure every index in the schema exists
/// 3. load the seed set, subject to the seed policy
pub struct Bootstrapper {
    store: Arc<dyn ReadingStore>,
    schema: CollectionSpec,
    seed_policy: SeedPolicy,
}

impl Bootstrapper {
    pub fn new(store: Arc<dyn ReadingStore>, schema: CollectionSpec, seed_policy: SeedPolicy) -> Self {
        Self {
            store,
            schema,
            seed_policy,
        }
    }

    pub async fn run(&self, now: DateTime<Utc>) -> Result<BootstrapReport, DomainError> {
        let database = self.store.database_name();
        debug!(
            database = %database,
            collection = %self.schema.name,
            seed_policy = %self.seed_policy,
            "Bootstrapping collection"
        );

        let schema = self.ensure_schema().await?;
        let inserted = self.load_seed(now).await?;
        let total_documents = self.store.count_readings(&self.schema.name).await?;

        Ok(BootstrapReport {
            database,
            collection: self.schema.name.clone(),
            schema,
            inserted,
            total_documents,
        })
    }

    /// Collection plus indexes. Safe to repeat: nothing is duplicated.
    pub async fn ensure_schema(&self) -> Result<SchemaOutcome, DomainError> {
        let collection = &self.schema.name;

        let collection_created = self.store.ensure_collection(collection).await?;
        if collection_created {
            debug!(collection = %collection, "Created collection");
        } else {
            debug!(collection = %collection, "Collection already exists");
        }

        let mut indexes = Vec::with_capacity(self.schema.indexes.len());
        for index in &self.schema.indexes {
            let name = self.store.ensure_index(collection, index).await?;
            debug!(collection = %collection, index = %name, "Index ensured");
            indexes.push(name);
        }
        debug!(collection = %collection, count = indexes.len(), "Indexes ensured");

        Ok(SchemaOutcome {
            collection_created,
            indexes,
        })
    }

    /// Insert the sample readings. Returns how many were inserted.
    pub async fn load_seed(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let collection = &self.schema.name;

        match self.seed_policy {
            SeedPolicy::Skip => {
                debug!(collection = %collection, "Seeding disabled");
                return Ok(0);
            }
            SeedPolicy::IfEmpty => {
                let existing = self.store.count_readings(collection).await?;
                if existing > 0 {
                    debug!(collection = %collection, existing, "Collection not empty, skipping seed");
                    return Ok(0);
                }
            }
            SeedPolicy::Always => {}
        }

        let seed = SeedSet::sample(now)?;
        let inserted = self.store.insert_readings(collection, seed.readings()).await?;
        debug!(collection = %collection, inserted, "Seed readings inserted");
        Ok(inserted)
    }
}
