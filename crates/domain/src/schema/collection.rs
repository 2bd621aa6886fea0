use super::{IndexKey, IndexSpec};
use serde::{Deserialize, Serialize};

/// A named collection and the secondary indexes it must carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
    pub name: String,
    pub indexes: Vec<IndexSpec>,
}

impl CollectionSpec {
    pub const SENSOR_READINGS: &'static str = "sensor_readings";

    /// The `sensor_readings` collection under the given name.
    ///
    /// - `wall_id` asc: lookups by wall
    /// - `server_timestamp` desc: most recent first
    /// - `(wall_id asc, server_timestamp desc)`: latest N for one wall, no extra sort
    /// - `created_at` desc: most recently created first
    pub fn sensor_readings(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexes: vec![
                IndexSpec::single(IndexKey::asc("wall_id")),
                IndexSpec::single(IndexKey::desc("server_timestamp")),
                IndexSpec::single(IndexKey::asc("wall_id")).then(IndexKey::desc("server_timestamp")),
                IndexSpec::single(IndexKey::desc("created_at")),
            ],
        }
    }

    pub fn index_names(&self) -> Vec<String> {
        self.indexes.iter().map(IndexSpec::name).collect()
    }
}

impl Default for CollectionSpec {
    fn default() -> Self {
        Self::sensor_readings(Self::SENSOR_READINGS)
    }
}
