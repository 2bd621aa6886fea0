use super::{SensorReading, WallId};
use crate::DomainError;
use crate::schema::IndexSpec;
use async_trait::async_trait;

/// Storage port for sensor readings
///
/// Implementations live in the infrastructure layer (MongoDB, SQLite). An
/// implementation is bound to one database; collection names select within it.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Name of the database this store is bound to
    fn database_name(&self) -> String;

    /// Create the collection unless it exists. Returns true if it was created.
    async fn ensure_collection(&self, collection: &str) -> Result<bool, DomainError>;

    /// Create the index unless an identical one exists. Returns the index name.
    async fn ensure_index(&self, collection: &str, index: &IndexSpec)
    -> Result<String, DomainError>;

    /// Names of the secondary indexes on the collection (primary key excluded)
    async fn list_indexes(&self, collection: &str) -> Result<Vec<String>, DomainError>;

    /// Insert all readings. Returns the number of inserted documents.
    async fn insert_readings(
        &self,
        collection: &str,
        readings: &[SensorReading],
    ) -> Result<u64, DomainError>;

    /// Count all documents in the collection
    async fn count_readings(&self, collection: &str) -> Result<u64, DomainError>;

    /// Count documents for one wall
    async fn count_by_wall(&self, collection: &str, wall_id: &WallId)
    -> Result<u64, DomainError>;

    /// Readings for one wall, most recent `server_timestamp` first
    async fn find_by_wall(
        &self,
        collection: &str,
        wall_id: &WallId,
    ) -> Result<Vec<SensorReading>, DomainError>;
}
