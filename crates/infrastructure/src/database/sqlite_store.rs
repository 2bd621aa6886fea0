use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{DomainError, IndexSpec, ReadingStore, SensorReading, WallId};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::time::Duration;
use tracing::debug;

/// SQLite adapter for the `ReadingStore` port.
///
/// A collection maps to a table. Datetimes are stored as epoch milliseconds
/// so ordering on them is numeric. Index names are prefixed with the table
/// name (`sensor_readings.wall_id_1`) because SQLite index names are global.
#[derive(Clone)]
pub struct SqliteReadingStore {
    pool: Pool<Sqlite>,
    database: String,
}

impl SqliteReadingStore {
    /// Open `<data_dir>/<database>.db`, creating it if needed.
    /// `:memory:` opens a private in-memory database instead.
    pub async fn open(data_dir: &str, database: &str) -> Result<Self, DomainError> {
        if data_dir == ":memory:" {
            return Self::connect("sqlite::memory:", database).await;
        }

        std::fs::create_dir_all(data_dir).map_err(|e| {
            DomainError::Storage(format!("Failed to create data directory {}: {}", data_dir, e))
        })?;
        let url = format!("sqlite://{}/{}.db?mode=rwc", data_dir, database);
        Self::connect(&url, database).await
    }

    pub async fn connect(connection_string: &str, database: &str) -> Result<Self, DomainError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1) // SQLite is single-writer
            // An in-memory database lives only as long as its connection
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect(connection_string)
            .await
            .map_err(storage_error("Failed to open SQLite database"))?;

        debug!(database = %database, url = %connection_string, "Opened SQLite database");
        Ok(Self {
            pool,
            database: database.to_string(),
        })
    }

    async fn table_exists(&self, table: &str) -> Result<bool, DomainError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(table)
                .fetch_one(&self.pool)
                .await
                .map_err(storage_error("Failed to inspect schema"))?;
        Ok(count > 0)
    }

    async fn column_names(&self, table: &str) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar("SELECT name FROM pragma_table_info(?)")
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to inspect columns"))
    }
}

#[async_trait]
impl ReadingStore for SqliteReadingStore {
    fn database_name(&self) -> String {
        self.database.clone()
    }

    async fn ensure_collection(&self, collection: &str) -> Result<bool, DomainError> {
        let table = quote_ident(collection)?;
        if self.table_exists(collection).await? {
            debug!(collection = %collection, "Table already exists");
            return Ok(false);
        }

        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY,
                wall_id TEXT NOT NULL,
                device_count INTEGER NOT NULL,
                timestamp INTEGER NOT NULL,
                server_timestamp INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            )"
        ))
        .execute(&self.pool)
        .await
        .map_err(storage_error("Failed to create table"))?;
        Ok(true)
    }

    async fn ensure_index(
        &self,
        collection: &str,
        index: &IndexSpec,
    ) -> Result<String, DomainError> {
        let table = quote_ident(collection)?;
        let name = index.name();

        // A quoted name that matches no column is read as a string literal, so check first
        let existing = self.column_names(collection).await?;
        if let Some(key) = index.keys().iter().find(|k| !existing.contains(&k.field)) {
            return Err(DomainError::InvalidIndex(format!(
                "{} has no field {} (index {})",
                collection, key.field, name
            )));
        }

        let columns = index
            .keys()
            .iter()
            .map(|k| quote_ident(&k.field).map(|field| format!("{} {}", field, k.direction.as_sql())))
            .collect::<Result<Vec<_>, DomainError>>()?
            .join(", ");

        // The name encodes every key and direction, so a name match is a definition match
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS \"{collection}.{name}\" ON {table} ({columns})"
        ))
        .execute(&self.pool)
        .await
        .map_err(storage_error("Failed to create index"))?;
        Ok(name)
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<String>, DomainError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = ? ORDER BY rowid",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("Failed to list indexes"))?;

        let prefix = format!("{}.", collection);
        Ok(names
            .into_iter()
            .filter_map(|name| name.strip_prefix(&prefix).map(str::to_string))
            .collect())
    }

    async fn insert_readings(
        &self,
        collection: &str,
        readings: &[SensorReading],
    ) -> Result<u64, DomainError> {
        let table = quote_ident(collection)?;
        let sql = format!(
            "INSERT INTO {table} (wall_id, device_count, timestamp, server_timestamp, created_at)
             VALUES (?, ?, ?, ?, ?)"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("Failed to start transaction"))?;

        for reading in readings {
            sqlx::query(&sql)
                .bind(reading.wall_id.as_str())
                .bind(i64::from(reading.device_count))
                .bind(reading.timestamp)
                .bind(reading.server_timestamp.timestamp_millis())
                .bind(reading.created_at.timestamp_millis())
                .execute(&mut *tx)
                .await
                .map_err(storage_error("Failed to insert reading"))?;
        }

        tx.commit()
            .await
            .map_err(storage_error("Failed to commit readings"))?;
        Ok(readings.len() as u64)
    }

    async fn count_readings(&self, collection: &str) -> Result<u64, DomainError> {
        let table = quote_ident(collection)?;
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("Failed to count readings"))?;
        Ok(count.max(0) as u64)
    }

    async fn count_by_wall(&self, collection: &str, wall_id: &WallId) -> Result<u64, DomainError> {
        let table = quote_ident(collection)?;
        let count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE wall_id = ?"))
                .bind(wall_id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(storage_error("Failed to count readings"))?;
        Ok(count.max(0) as u64)
    }

    async fn find_by_wall(
        &self,
        collection: &str,
        wall_id: &WallId,
    ) -> Result<Vec<SensorReading>, DomainError> {
        let table = quote_ident(collection)?;
        let rows = sqlx::query(&format!(
            "SELECT wall_id, device_count, timestamp, server_timestamp, created_at
             FROM {table} WHERE wall_id = ? ORDER BY server_timestamp DESC"
        ))
        .bind(wall_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("Failed to query readings"))?;

        rows.iter().map(row_to_reading).collect()
    }
}

fn row_to_reading(row: &SqliteRow) -> Result<SensorReading, DomainError> {
    let wall_id: String = row.try_get("wall_id").map_err(storage_error("Bad wall_id"))?;
    let device_count: i64 = row
        .try_get("device_count")
        .map_err(storage_error("Bad device_count"))?;
    let device_count = u32::try_from(device_count).map_err(|_| {
        DomainError::Storage(format!("device_count out of range: {}", device_count))
    })?;
    let timestamp: i64 = row.try_get("timestamp").map_err(storage_error("Bad timestamp"))?;
    let server_timestamp: i64 = row
        .try_get("server_timestamp")
        .map_err(storage_error("Bad server_timestamp"))?;
    let created_at: i64 = row
        .try_get("created_at")
        .map_err(storage_error("Bad created_at"))?;

    Ok(SensorReading::new(
        WallId::new(wall_id)?,
        device_count,
        timestamp,
        from_millis(server_timestamp)?,
        from_millis(created_at)?,
    ))
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>, DomainError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| DomainError::Storage(format!("Datetime out of range: {}", millis)))
}

/// Collection and field names end up in SQL text, so only plain identifiers pass
fn quote_ident(name: &str) -> Result<String, DomainError> {
    let valid = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid {
        return Err(DomainError::InvalidConfiguration(format!(
            "Invalid collection or field name: {:?}",
            name
        )));
    }
    Ok(format!("\"{}\"", name))
}

fn storage_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::Storage(format!("{}: {}", context, e))
}
