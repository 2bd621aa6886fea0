mod policy;

pub use policy::SeedPolicy;

use crate::error::Result;
use crate::reading::{SensorReading, WallId};
use chrono::{DateTime, Duration, Utc};

/// Sample readings loaded into a fresh `sensor_readings` collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSet {
    readings: Vec<SensorReading>,
}

impl SeedSet {
    /// How far the older `test_wall` reading lies before `now`
    pub const HISTORY_OFFSET_MS: i64 = 600_000;

    /// Three readings relative to `now`:
    /// `test_wall` (5 devices) at now, `test_wall` (8 devices) ten minutes
    /// earlier, and `lower_town_wall` (12 devices) at now.
    pub fn sample(now: DateTime<Utc>) -> Result<Self> {
        let test_wall = WallId::new("test_wall")?;
        let lower_town_wall = WallId::new("lower_town_wall")?;
        let earlier = now - Duration::milliseconds(Self::HISTORY_OFFSET_MS);

        Ok(Self {
            readings: vec![
                SensorReading::captured_at(test_wall.clone(), 5, now),
                SensorReading::captured_at(test_wall, 8, earlier),
                SensorReading::captured_at(lower_town_wall, 12, now),
            ],
        })
    }

    pub fn readings(&self) -> &[SensorReading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
