mod entity;
mod store;
mod wall_id;

pub use entity::SensorReading;
pub use store::ReadingStore;
#[cfg(any(test, feature = "mock"))]
pub use store::MockReadingStore;
pub use wall_id::WallId;
