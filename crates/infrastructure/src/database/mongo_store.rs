//! MongoDB adapter for the `ReadingStore` port.
//!
//! Readings are stored as plain documents:
//! `{ wall_id: string, device_count: long, timestamp: long, server_timestamp: date, created_at: date }`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{DomainError, IndexSpec, ReadingStore, SensorReading, WallId};
use futures::TryStreamExt;
use mongodb::bson::{Bson, DateTime as BsonDateTime, Document, doc};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::debug;

/// Name MongoDB gives the primary key index
const PRIMARY_INDEX: &str = "_id_";

pub struct MongoReadingStore {
    db: Database,
}

impl MongoReadingStore {
    /// Connect, verify the server answers a ping, and select `database`.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, DomainError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(storage_error("Failed to connect to MongoDB"))?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(storage_error("Failed to ping MongoDB"))?;

        debug!(database = %database, "Connected to MongoDB");
        // MongoDB creates the database on first write
        Ok(Self {
            db: client.database(database),
        })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

#[async_trait]
impl ReadingStore for MongoReadingStore {
    fn database_name(&self) -> String {
        self.db.name().to_string()
    }

    async fn ensure_collection(&self, collection: &str) -> Result<bool, DomainError> {
        let existing = self
            .db
            .list_collection_names()
            .filter(doc! { "name": collection })
            .await
            .map_err(storage_error("Failed to list collections"))?;

        if existing.iter().any(|name| name == collection) {
            debug!(collection = %collection, "Collection already exists");
            return Ok(false);
        }

        self.db
            .create_collection(collection)
            .await
            .map_err(storage_error("Failed to create collection"))?;
        Ok(true)
    }

    async fn ensure_index(
        &self,
        collection: &str,
        index: &IndexSpec,
    ) -> Result<String, DomainError> {
        // createIndexes is a no-op for an existing index with the same keys and name
        let result = self
            .collection(collection)
            .create_index(index_model(index))
            .await
            .map_err(storage_error("Failed to create index"))?;
        Ok(result.index_name)
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<String>, DomainError> {
        let names = self
            .collection(collection)
            .list_index_names()
            .await
            .map_err(storage_error("Failed to list indexes"))?;

        Ok(names
            .into_iter()
            .filter(|name| name != PRIMARY_INDEX)
            .collect())
    }

    async fn insert_readings(
        &self,
        collection: &str,
        readings: &[SensorReading],
    ) -> Result<u64, DomainError> {
        // insertMany rejects an empty batch
        if readings.is_empty() {
            return Ok(0);
        }

        let documents: Vec<Document> = readings.iter().map(reading_to_document).collect();
        let result = self
            .collection(collection)
            .insert_many(documents)
            .await
            .map_err(storage_error("Failed to insert readings"))?;
        Ok(result.inserted_ids.len() as u64)
    }

    async fn count_readings(&self, collection: &str) -> Result<u64, DomainError> {
        self.collection(collection)
            .count_documents(doc! {})
            .await
            .map_err(storage_error("Failed to count readings"))
    }

    async fn count_by_wall(&self, collection: &str, wall_id: &WallId) -> Result<u64, DomainError> {
        self.collection(collection)
            .count_documents(doc! { "wall_id": wall_id.as_str() })
            .await
            .map_err(storage_error("Failed to count readings"))
    }

    async fn find_by_wall(
        &self,
        collection: &str,
        wall_id: &WallId,
    ) -> Result<Vec<SensorReading>, DomainError> {
        let cursor = self
            .collection(collection)
            .find(doc! { "wall_id": wall_id.as_str() })
            .sort(doc! { "server_timestamp": -1 })
            .await
            .map_err(storage_error("Failed to query readings"))?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(storage_error("Failed to read query results"))?;

        documents.iter().map(reading_from_document).collect()
    }
}

/// Key document plus explicit name, e.g. `{ wall_id: 1, server_timestamp: -1 }`
/// named `wall_id_1_server_timestamp_-1`.
pub fn index_model(index: &IndexSpec) -> IndexModel {
    let mut keys = Document::new();
    for key in index.keys() {
        keys.insert(key.field.clone(), key.direction.as_i32());
    }

    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().name(index.name()).build())
        .build()
}

pub fn reading_to_document(reading: &SensorReading) -> Document {
    doc! {
        "wall_id": reading.wall_id.as_str(),
        "device_count": i64::from(reading.device_count),
        "timestamp": reading.timestamp,
        "server_timestamp": BsonDateTime::from_millis(reading.server_timestamp.timestamp_millis()),
        "created_at": BsonDateTime::from_millis(reading.created_at.timestamp_millis()),
    }
}

pub fn reading_from_document(document: &Document) -> Result<SensorReading, DomainError> {
    let wall_id = document
        .get_str("wall_id")
        .map_err(|e| DomainError::Storage(format!("Bad wall_id field: {}", e)))?;
    let device_count = integer_field(document, "device_count")?;
    let device_count = u32::try_from(device_count).map_err(|_| {
        DomainError::Storage(format!("device_count out of range: {}", device_count))
    })?;

    Ok(SensorReading::new(
        WallId::new(wall_id)?,
        device_count,
        integer_field(document, "timestamp")?,
        datetime_field(document, "server_timestamp")?,
        datetime_field(document, "created_at")?,
    ))
}

/// Accepts int32, int64 and integral doubles (the shell writes numbers as doubles)
fn integer_field(document: &Document, field: &str) -> Result<i64, DomainError> {
    match document.get(field) {
        Some(Bson::Int32(v)) => Ok(i64::from(*v)),
        Some(Bson::Int64(v)) => Ok(*v),
        // i64::MAX as f64 rounds up to 2^63, hence the exclusive upper bound
        Some(Bson::Double(v))
            if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 =>
        {
            Ok(*v as i64)
        }
        Some(other) => Err(DomainError::Storage(format!(
            "Field {} is not an integer: {}",
            field, other
        ))),
        None => Err(DomainError::Storage(format!("Missing field {}", field))),
    }
}

fn datetime_field(document: &Document, field: &str) -> Result<DateTime<Utc>, DomainError> {
    let millis = document
        .get_datetime(field)
        .map_err(|e| DomainError::Storage(format!("Bad {} field: {}", field, e)))?
        .timestamp_millis();

    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| DomainError::Storage(format!("{} out of range: {}", field, millis)))
}

fn storage_error(context: &'static str) -> impl Fn(mongodb::error::Error) -> DomainError {
    move |e| DomainError::Storage(format!("{}: {}", context, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain::{CollectionSpec, IndexKey};

    fn reading() -> SensorReading {
        let at = Utc.timestamp_millis_opt(1_760_600_000_000).unwrap();
        SensorReading::captured_at(WallId::new("test_wall").unwrap(), 5, at)
    }

    #[test]
    fn test_document_has_all_fields() {
        let document = reading_to_document(&reading());

        assert_eq!(document.get_str("wall_id").unwrap(), "test_wall");
        assert_eq!(document.get_i64("device_count").unwrap(), 5);
        assert_eq!(document.get_i64("timestamp").unwrap(), 1_760_600_000_000);
        assert_eq!(
            document.get_datetime("server_timestamp").unwrap().timestamp_millis(),
            1_760_600_000_000
        );
        assert!(document.get_datetime("created_at").is_ok());
        assert_eq!(document.len(), 5);
    }

    #[test]
    fn test_document_back_to_reading() {
        let original = reading();
        let parsed = reading_from_document(&reading_to_document(&original)).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_shell_style_numbers_accepted() {
        let document = doc! {
            "wall_id": "lower_town_wall",
            "device_count": 12.0,
            "timestamp": 1_760_600_000_000.0,
            "server_timestamp": BsonDateTime::from_millis(1_760_600_000_000),
            "created_at": BsonDateTime::from_millis(1_760_600_000_000),
        };

        let parsed = reading_from_document(&document).unwrap();
        assert_eq!(parsed.device_count, 12);
        assert_eq!(parsed.timestamp, 1_760_600_000_000);
    }

    #[test]
    fn test_out_of_range_double_rejected() {
        let mut document = reading_to_document(&reading());
        document.insert("timestamp", 1e300);
        assert!(matches!(
            reading_from_document(&document),
            Err(DomainError::Storage(_))
        ));

        document.insert("timestamp", 9_223_372_036_854_775_808.0);
        assert!(reading_from_document(&document).is_err());
    }

    #[test]
    fn test_fractional_double_rejected() {
        let mut document = reading_to_document(&reading());
        document.insert("device_count", 4.5);
        assert!(reading_from_document(&document).is_err());
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut document = reading_to_document(&reading());
        document.remove("created_at");
        assert!(matches!(
            reading_from_document(&document),
            Err(DomainError::Storage(_))
        ));
    }

    #[test]
    fn test_compound_index_model() {
        let index = IndexSpec::single(IndexKey::asc("wall_id"))
            .then(IndexKey::desc("server_timestamp"));
        let model = index_model(&index);

        assert_eq!(model.keys, doc! { "wall_id": 1, "server_timestamp": -1 });
        assert_eq!(
            model.options.and_then(|o| o.name).as_deref(),
            Some("wall_id_1_server_timestamp_-1")
        );
    }

    #[test]
    fn test_index_models_for_sensor_readings() {
        let keys: Vec<Document> = CollectionSpec::default()
            .indexes
            .iter()
            .map(|i| index_model(i).keys)
            .collect();

        assert_eq!(
            keys,
            vec![
                doc! { "wall_id": 1 },
                doc! { "server_timestamp": -1 },
                doc! { "wall_id": 1, "server_timestamp": -1 },
                doc! { "created_at": -1 },
            ]
        );
    }
}
