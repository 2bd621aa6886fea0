use super::WallId;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// One observation of how many devices were seen at a wall.
///
/// All five fields are mandatory. Datetimes are kept at millisecond
/// precision, the resolution of both `timestamp` and the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReading {
    pub wall_id: WallId,
    pub device_count: u32,
    /// Client-side capture time, epoch milliseconds
    pub timestamp: i64,
    pub server_timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SensorReading {
    pub fn new(
        wall_id: WallId,
        device_count: u32,
        timestamp: i64,
        server_timestamp: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            wall_id,
            device_count,
            timestamp,
            server_timestamp: server_timestamp.trunc_subsecs(3),
            created_at: created_at.trunc_subsecs(3),
        }
    }

    /// A reading captured, received and created at the same instant.
    pub fn captured_at(wall_id: WallId, device_count: u32, at: DateTime<Utc>) -> Self {
        Self::new(wall_id, device_count, at.timestamp_millis(), at, at)
    }
}
